use rust_decimal::Decimal;
use std::fmt;

/// Coarse classification of a [`FieldError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    FieldType,
    FieldBounds,
    FieldPattern,
    MissingField,
    CrossFieldInvariant,
}

/// The constraint a value fell outside of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound {
    Minimum { limit: Decimal, actual: Decimal },
    Maximum { limit: Decimal, actual: Decimal },
    MinLength { limit: usize, actual: usize },
    MaxLength { limit: usize, actual: usize },
    /// A number beyond what the decimal type can represent.
    Magnitude { raw: String },
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Minimum { limit, actual } => {
                write!(f, "input should be greater than or equal to {limit}, got {actual}")
            }
            Bound::Maximum { limit, actual } => {
                write!(f, "input should be less than or equal to {limit}, got {actual}")
            }
            Bound::MinLength { limit, actual } => write!(
                f,
                "string should have at least {limit} character(s), got {actual}"
            ),
            Bound::MaxLength { limit, actual } => write!(
                f,
                "string should have at most {limit} character(s), got {actual}"
            ),
            Bound::Magnitude { raw } => write!(
                f,
                "input should be within +/-{}, got {raw}",
                Decimal::MAX
            ),
        }
    }
}

/// A single violation, tagged with the offending field path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{path}: expected {expected}")]
    FieldType { path: String, expected: &'static str },
    #[error("{path}: {bound}")]
    FieldBounds { path: String, bound: Bound },
    #[error("{path}: '{value}' is not a member of enumeration [{}]", .allowed.join(", "))]
    FieldPattern {
        path: String,
        value: String,
        allowed: &'static [&'static str],
    },
    #[error("{path}: field required")]
    MissingField { path: String },
    #[error("{path}: {rule}, got {actual}")]
    CrossFieldInvariant {
        path: String,
        rule: &'static str,
        actual: Decimal,
    },
}

impl FieldError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FieldError::FieldType { .. } => ErrorKind::FieldType,
            FieldError::FieldBounds { .. } => ErrorKind::FieldBounds,
            FieldError::FieldPattern { .. } => ErrorKind::FieldPattern,
            FieldError::MissingField { .. } => ErrorKind::MissingField,
            FieldError::CrossFieldInvariant { .. } => ErrorKind::CrossFieldInvariant,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            FieldError::FieldType { path, .. }
            | FieldError::FieldBounds { path, .. }
            | FieldError::FieldPattern { path, .. }
            | FieldError::MissingField { path }
            | FieldError::CrossFieldInvariant { path, .. } => path,
        }
    }
}

/// Every violation found while constructing one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    entity: &'static str,
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|error| error.kind() == kind)
    }

    /// Violations reported against `path`.
    pub fn at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |error| error.path() == path)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.errors.len() == 1 { "error" } else { "errors" };
        write!(
            f,
            "{} validation {} for {}",
            self.errors.len(),
            noun,
            self.entity
        )?;
        for error in &self.errors {
            write!(f, "\n  {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Accumulates violations while an entity is being constructed.
#[derive(Debug)]
pub struct Violations {
    entity: &'static str,
    errors: Vec<FieldError>,
}

impl Violations {
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            errors: Vec::new(),
        }
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn missing(&mut self, path: impl Into<String>) {
        self.push(FieldError::MissingField { path: path.into() });
    }

    pub fn wrong_type(&mut self, path: impl Into<String>, expected: &'static str) {
        self.push(FieldError::FieldType {
            path: path.into(),
            expected,
        });
    }

    pub fn out_of_bounds(&mut self, path: impl Into<String>, bound: Bound) {
        self.push(FieldError::FieldBounds {
            path: path.into(),
            bound,
        });
    }

    pub fn not_a_member(
        &mut self,
        path: impl Into<String>,
        value: impl Into<String>,
        allowed: &'static [&'static str],
    ) {
        self.push(FieldError::FieldPattern {
            path: path.into(),
            value: value.into(),
            allowed,
        });
    }

    /// Resolve to `value` when nothing was recorded. `build` only runs on a
    /// clean collector, so partially-read fields never escape.
    pub fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            if let Some(value) = build() {
                return Ok(value);
            }
        }
        tracing::debug!(
            entity = self.entity,
            violations = self.errors.len(),
            "rejected contract construction"
        );
        Err(ValidationErrors {
            entity: self.entity,
            errors: self.errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_violation() {
        let mut violations = Violations::new("Company");
        violations.missing("name");
        violations.out_of_bounds(
            "enterprise_value",
            Bound::Minimum {
                limit: Decimal::ZERO,
                actual: Decimal::NEGATIVE_ONE,
            },
        );

        let errors = violations
            .finish(|| Some(()))
            .expect_err("violations reported");

        assert_eq!(errors.entity(), "Company");
        assert_eq!(errors.len(), 2);
        assert!(errors.has_kind(ErrorKind::MissingField));
        assert!(errors.has_kind(ErrorKind::FieldBounds));
        let rendered = errors.to_string();
        assert!(rendered.starts_with("2 validation errors for Company"));
        assert!(rendered.contains("greater than or equal to 0"));
    }

    #[test]
    fn clean_collector_yields_value() {
        let value = Violations::new("Company")
            .finish(|| Some(42))
            .expect("clean");
        assert_eq!(value, 42);
    }

    #[test]
    fn pattern_error_names_allowed_members() {
        let error = FieldError::FieldPattern {
            path: "confidence_level".to_string(),
            value: "HIGH".to_string(),
            allowed: &["high", "medium", "low"],
        };
        assert_eq!(error.kind(), ErrorKind::FieldPattern);
        assert_eq!(
            error.to_string(),
            "confidence_level: 'HIGH' is not a member of enumeration [high, medium, low]"
        );
    }
}
