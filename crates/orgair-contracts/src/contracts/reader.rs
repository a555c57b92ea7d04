use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::fields::{FieldShape, FieldSpec};
use super::numeric::{coerce_decimal, normalize_score, NumericError};
use super::validation::{Bound, ValidationErrors, Violations};
use super::vocabulary::{DimensionName, Vocabulary};

const DATE_FORMAT: &str = "%Y-%m-%d";
const NAIVE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Cursor over one raw input object. Absent and `null` fields are treated the
/// same; unknown keys are ignored.
pub struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
    violations: Violations,
}

impl<'a> FieldReader<'a> {
    pub fn new(entity: &'static str, input: &'a Value) -> Result<Self, ValidationErrors> {
        match input {
            Value::Object(fields) => Ok(Self {
                fields,
                violations: Violations::new(entity),
            }),
            _ => {
                let mut violations = Violations::new(entity);
                violations.wrong_type("$", "an object");
                violations.finish(|| None::<Self>)
            }
        }
    }

    pub fn violations(&mut self) -> &mut Violations {
        &mut self.violations
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_clean()
    }

    pub fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, ValidationErrors> {
        self.violations.finish(build)
    }

    fn raw(&mut self, spec: &FieldSpec) -> Option<&'a Value> {
        match self.fields.get(spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    self.violations.missing(spec.name);
                }
                None
            }
            Some(value) => Some(value),
        }
    }

    pub fn text(&mut self, spec: &FieldSpec) -> Option<String> {
        let value = self.raw(spec)?;
        let Value::String(text) = value else {
            self.violations.wrong_type(spec.name, "a string");
            return None;
        };

        let before = self.violations.len();
        match spec.shape {
            FieldShape::Text { min_len, max_len } => {
                check_length(&mut self.violations, spec.name, text, min_len, max_len)
            }
            FieldShape::Pattern { values, .. } if !values.contains(&text.as_str()) => {
                self.violations.not_a_member(spec.name, text.as_str(), values)
            }
            _ => {}
        }
        (self.violations.len() == before).then(|| text.clone())
    }

    pub fn member<V: Vocabulary>(&mut self, spec: &FieldSpec) -> Option<V> {
        let value = self.raw(spec)?;
        let Value::String(text) = value else {
            self.violations.wrong_type(spec.name, "a string");
            return None;
        };
        match V::parse(text) {
            Ok(member) => Some(member),
            Err(unknown) => {
                self.violations
                    .not_a_member(spec.name, unknown.value, unknown.allowed);
                None
            }
        }
    }

    pub fn decimal(&mut self, spec: &FieldSpec) -> Option<Decimal> {
        let value = self.raw(spec)?;
        let mut number = coerce(&mut self.violations, spec.name, value)?;
        if spec.shape == FieldShape::Score {
            number = normalize_score(number);
        }
        let (minimum, maximum) = spec.shape.decimal_bounds();
        check_range(&mut self.violations, spec.name, number, minimum, maximum).then_some(number)
    }

    pub fn date(&mut self, spec: &FieldSpec) -> Option<NaiveDate> {
        let value = self.raw(spec)?;
        let parsed = value
            .as_str()
            .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok());
        if parsed.is_none() {
            self.violations
                .wrong_type(spec.name, "an ISO-8601 calendar date (YYYY-MM-DD)");
        }
        parsed
    }

    pub fn datetime(&mut self, spec: &FieldSpec) -> Option<DateTime<Utc>> {
        let value = self.raw(spec)?;
        let parsed = value.as_str().and_then(parse_datetime);
        if parsed.is_none() {
            self.violations
                .wrong_type(spec.name, "an ISO-8601 date-time");
        }
        parsed
    }

    pub fn text_list(&mut self, spec: &FieldSpec) -> Option<Vec<String>> {
        let value = self.raw(spec)?;
        let Value::Array(items) = value else {
            self.violations.wrong_type(spec.name, "a list of strings");
            return None;
        };

        let before = self.violations.len();
        let mut collected = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match item {
                Value::String(text) => collected.push(text.clone()),
                _ => self
                    .violations
                    .wrong_type(format!("{}[{index}]", spec.name), "a string"),
            }
        }
        (self.violations.len() == before).then_some(collected)
    }

    pub fn count(&mut self, spec: &FieldSpec) -> Option<u64> {
        let value = self.raw(spec)?;
        let Value::Number(number) = value else {
            self.violations
                .wrong_type(spec.name, "a non-negative integer");
            return None;
        };

        if let Some(count) = number.as_u64() {
            return Some(count);
        }
        if let Some(negative) = number.as_i64() {
            self.violations.out_of_bounds(
                spec.name,
                Bound::Minimum {
                    limit: Decimal::ZERO,
                    actual: Decimal::from(negative),
                },
            );
            return None;
        }
        match number.as_f64() {
            Some(whole) if whole.fract() == 0.0 && (0.0..=u64::MAX as f64).contains(&whole) => {
                Some(whole as u64)
            }
            _ => {
                self.violations
                    .wrong_type(spec.name, "a non-negative integer");
                None
            }
        }
    }

    /// Read an object that must carry one decimal per dimension. Unknown keys
    /// are vocabulary violations and missing keys are reported individually.
    pub fn dimension_map(&mut self, spec: &FieldSpec) -> Option<BTreeMap<DimensionName, Decimal>> {
        let value = self.raw(spec)?;
        let Value::Object(entries) = value else {
            self.violations
                .wrong_type(spec.name, "an object keyed by dimension name");
            return None;
        };

        let (minimum, maximum) = spec.shape.decimal_bounds();
        let before = self.violations.len();
        let mut map = BTreeMap::new();
        for (key, raw) in entries {
            let path = format!("{}.{key}", spec.name);
            let dimension = match DimensionName::parse(key) {
                Ok(dimension) => Some(dimension),
                Err(unknown) => {
                    self.violations
                        .not_a_member(path.as_str(), unknown.value, unknown.allowed);
                    None
                }
            };
            let Some(number) = coerce(&mut self.violations, &path, raw) else {
                continue;
            };
            if !check_range(&mut self.violations, &path, number, minimum, maximum) {
                continue;
            }
            if let Some(dimension) = dimension {
                map.insert(dimension, number);
            }
        }

        for dimension in DimensionName::ordered() {
            if !entries.contains_key(dimension.as_str()) {
                self.violations
                    .missing(format!("{}.{}", spec.name, dimension.as_str()));
            }
        }

        (self.violations.len() == before).then_some(map)
    }
}

/// Accepts RFC 3339 strings and offset-less date-times, which are read as UTC.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .map(|parsed| parsed.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(trimmed, NAIVE_DATETIME_FORMAT)
                .ok()
                .map(|naive| naive.and_utc())
        })
}

fn coerce(violations: &mut Violations, path: &str, value: &Value) -> Option<Decimal> {
    match coerce_decimal(value) {
        Ok(number) => Some(number),
        Err(NumericError::NotANumber) => {
            violations.wrong_type(path, "a decimal number");
            None
        }
        Err(NumericError::OutOfRange { raw }) => {
            violations.out_of_bounds(path, Bound::Magnitude { raw });
            None
        }
    }
}

fn check_length(
    violations: &mut Violations,
    path: &str,
    text: &str,
    min_len: Option<usize>,
    max_len: Option<usize>,
) {
    let actual = text.chars().count();
    if let Some(limit) = min_len.filter(|limit| actual < *limit) {
        violations.out_of_bounds(path, Bound::MinLength { limit, actual });
    }
    if let Some(limit) = max_len.filter(|limit| actual > *limit) {
        violations.out_of_bounds(path, Bound::MaxLength { limit, actual });
    }
}

fn check_range(
    violations: &mut Violations,
    path: &str,
    value: Decimal,
    minimum: Option<Decimal>,
    maximum: Option<Decimal>,
) -> bool {
    let mut within = true;
    if let Some(limit) = minimum.filter(|limit| value < *limit) {
        violations.out_of_bounds(
            path,
            Bound::Minimum {
                limit,
                actual: value,
            },
        );
        within = false;
    }
    if let Some(limit) = maximum.filter(|limit| value > *limit) {
        violations.out_of_bounds(
            path,
            Bound::Maximum {
                limit,
                actual: value,
            },
        );
        within = false;
    }
    within
}
