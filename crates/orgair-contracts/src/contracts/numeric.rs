use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Number, Value};
use std::str::FromStr;

/// Fractional digits every score is normalized to.
pub const SCORE_SCALE: u32 = 2;

/// Textual decimals accepted on the wire: optional sign, digits, optional
/// fraction and exponent, padded by ASCII whitespace. [`parse_decimal`] accepts
/// exactly this grammar.
pub const DECIMAL_PATTERN: &str =
    r"^[ \t\n\r]*[+-]?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?[ \t\n\r]*$";

/// Largest scale the decimal type can hold.
const MAX_SCALE: u32 = 28;

/// Why a raw value did not become a decimal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumericError {
    NotANumber,
    /// A well-formed number too large in magnitude for the decimal type.
    OutOfRange { raw: String },
}

/// Absolute tolerance allowed between a weight sum and 1.0.
pub fn weight_sum_tolerance() -> Decimal {
    Decimal::new(1, 3)
}

fn is_padding(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn all_digits(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|byte| byte.is_ascii_digit())
}

fn unsigned(part: &str) -> &str {
    part.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(part)
}

fn is_decimal_literal(literal: &str) -> bool {
    let body = unsigned(literal);
    let (mantissa, exponent) = match body.split_once(|c: char| c == 'e' || c == 'E') {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (body, None),
    };
    let (whole, fraction) = match mantissa.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (mantissa, None),
    };
    all_digits(whole)
        && fraction.map_or(true, all_digits)
        && exponent.map_or(true, |exponent| all_digits(unsigned(exponent)))
}

/// Parse a decimal literal, including scientific notation. Magnitudes below the
/// decimal type's precision round to 28 places (usually zero); magnitudes above
/// its range are [`NumericError::OutOfRange`].
pub fn parse_decimal(raw: &str) -> Result<Decimal, NumericError> {
    let literal = raw.trim_matches(is_padding);
    if !is_decimal_literal(literal) {
        return Err(NumericError::NotANumber);
    }
    if let Ok(value) = Decimal::from_str(literal).or_else(|_| Decimal::from_scientific(literal)) {
        return Ok(value);
    }

    let approximate: f64 = literal.parse().map_err(|_| NumericError::NotANumber)?;
    if approximate.abs() < 1.0 {
        return Ok(Decimal::from_f64(approximate)
            .map(|value| value.round_dp(MAX_SCALE))
            .unwrap_or(Decimal::ZERO));
    }
    Decimal::from_f64(approximate).ok_or_else(|| NumericError::OutOfRange {
        raw: literal.to_string(),
    })
}

/// Coerce a JSON number through its shortest textual form, so `75.567` and
/// `"75.567"` yield the same decimal.
pub fn decimal_from_number(number: &Number) -> Result<Decimal, NumericError> {
    if let Some(value) = number.as_i64() {
        return Ok(Decimal::from(value));
    }
    if let Some(value) = number.as_u64() {
        return Ok(Decimal::from(value));
    }
    parse_decimal(&number.to_string())
}

/// Coerce an integer, float or decimal string. Booleans and other JSON types
/// are not numbers.
pub fn coerce_decimal(value: &Value) -> Result<Decimal, NumericError> {
    match value {
        Value::Number(number) => decimal_from_number(number),
        Value::String(raw) => parse_decimal(raw),
        _ => Err(NumericError::NotANumber),
    }
}

/// Round half away from zero to exactly two fractional digits.
pub fn normalize_score(raw: Decimal) -> Decimal {
    let mut rounded = raw.round_dp_with_strategy(SCORE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(SCORE_SCALE);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded
}

/// Sum in decimal arithmetic; `None` on overflow.
pub fn checked_sum<'a>(values: impl IntoIterator<Item = &'a Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(*value))
}

/// Whether `sum` is within the weight tolerance of 1.0.
pub fn sums_to_one(sum: Decimal) -> bool {
    (sum - Decimal::ONE).abs() <= weight_sum_tolerance()
}
