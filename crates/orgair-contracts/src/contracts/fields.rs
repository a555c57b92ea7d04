use rust_decimal::Decimal;

use super::vocabulary::Vocabulary;

/// Value shape and per-field constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    Text {
        min_len: Option<usize>,
        max_len: Option<usize>,
    },
    Decimal {
        minimum: Option<Decimal>,
        maximum: Option<Decimal>,
    },
    /// Decimal rounded to two places before the [0, 100] check.
    Score,
    Enumeration {
        name: &'static str,
        values: &'static [&'static str],
    },
    /// Free string constrained by an anchored pattern over `values`.
    Pattern {
        pattern: &'static str,
        values: &'static [&'static str],
    },
    Date,
    DateTime,
    TextList,
    Count,
    /// Object keyed by every dimension name.
    DimensionMap {
        minimum: Option<Decimal>,
        maximum: Option<Decimal>,
    },
}

impl FieldShape {
    pub const fn text(min_len: Option<usize>, max_len: Option<usize>) -> Self {
        Self::Text { min_len, max_len }
    }

    pub const fn bounded(minimum: Option<Decimal>, maximum: Option<Decimal>) -> Self {
        Self::Decimal { minimum, maximum }
    }

    pub const fn member_of<V: Vocabulary>() -> Self {
        Self::Enumeration {
            name: V::NAME,
            values: V::VALUES,
        }
    }

    /// Bounds applied to a decimal-valued field.
    pub fn decimal_bounds(self) -> (Option<Decimal>, Option<Decimal>) {
        match self {
            Self::Decimal { minimum, maximum } | Self::DimensionMap { minimum, maximum } => {
                (minimum, maximum)
            }
            Self::Score => (Some(Decimal::ZERO), Some(Decimal::ONE_HUNDRED)),
            _ => (None, None),
        }
    }
}

/// Default published for an optional field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Null,
    Text(&'static str),
    Integer(u64),
    EmptyList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub shape: FieldShape,
    pub required: bool,
    pub default: Option<FieldDefault>,
    pub description: Option<&'static str>,
}

impl FieldSpec {
    pub const fn required(name: &'static str, shape: FieldShape) -> Self {
        Self {
            name,
            shape,
            required: true,
            default: None,
            description: None,
        }
    }

    pub const fn optional(name: &'static str, shape: FieldShape) -> Self {
        Self {
            name,
            shape,
            required: false,
            default: Some(FieldDefault::Null),
            description: None,
        }
    }

    pub const fn defaulted(name: &'static str, shape: FieldShape, default: FieldDefault) -> Self {
        Self {
            name,
            shape,
            required: false,
            default: Some(default),
            description: None,
        }
    }

    /// Generated by the system when absent; published without a default.
    pub const fn generated(name: &'static str, shape: FieldShape) -> Self {
        Self {
            name,
            shape,
            required: false,
            default: None,
            description: None,
        }
    }

    pub const fn describe(self, description: &'static str) -> Self {
        Self {
            description: Some(description),
            ..self
        }
    }
}

pub const UNBOUNDED_TEXT: FieldShape = FieldShape::text(None, None);
pub const NON_EMPTY_TEXT: FieldShape = FieldShape::text(Some(1), None);
pub const UNIT_INTERVAL: FieldShape = FieldShape::bounded(Some(Decimal::ZERO), Some(Decimal::ONE));
pub const PERCENT_RANGE: FieldShape =
    FieldShape::bounded(Some(Decimal::ZERO), Some(Decimal::ONE_HUNDRED));
pub const NON_NEGATIVE: FieldShape = FieldShape::bounded(Some(Decimal::ZERO), None);
pub const UNBOUNDED_DECIMAL: FieldShape = FieldShape::bounded(None, None);
