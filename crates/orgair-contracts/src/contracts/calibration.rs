use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use super::fields::{FieldShape, FieldSpec, NON_EMPTY_TEXT, PERCENT_RANGE, UNBOUNDED_TEXT};
use super::numeric::{checked_sum, sums_to_one, weight_sum_tolerance};
use super::reader::FieldReader;
use super::validation::{FieldError, ValidationErrors};
use super::vocabulary::DimensionName;
use super::Contract;

/// One decimal per dimension, ordered by dimension.
pub type DimensionMap = BTreeMap<DimensionName, Decimal>;

pub const WEIGHT_SUM_RULE: &str = "dimension weights must sum to 1.0";

/// Default weights in hundredths, used when a sector has no override.
const DEFAULT_WEIGHT_HUNDREDTHS: [(DimensionName, i64); DimensionName::COUNT] = [
    (DimensionName::DataInfrastructure, 25),
    (DimensionName::AiGovernance, 20),
    (DimensionName::TechnologyStack, 15),
    (DimensionName::Talent, 15),
    (DimensionName::Leadership, 10),
    (DimensionName::UseCasePortfolio, 10),
    (DimensionName::Culture, 5),
];

/// The canonical weight table. Built once and never mutated; overrides are
/// passed into calibration construction instead.
pub fn default_weights() -> &'static DimensionMap {
    static DEFAULTS: OnceLock<DimensionMap> = OnceLock::new();
    DEFAULTS.get_or_init(|| {
        DEFAULT_WEIGHT_HUNDREDTHS
            .iter()
            .map(|(dimension, hundredths)| (*dimension, Decimal::new(*hundredths, 2)))
            .collect()
    })
}

const SECTOR_ID: FieldSpec = FieldSpec::required("sector_id", NON_EMPTY_TEXT);
const SECTOR_NAME: FieldSpec = FieldSpec::required("sector_name", UNBOUNDED_TEXT);
const H_R_BASELINE: FieldSpec = FieldSpec::required("h_r_baseline", PERCENT_RANGE)
    .describe("Systematic Opportunity (H^R) baseline score");
const H_R_CI_LOWER: FieldSpec =
    FieldSpec::optional("h_r_ci_lower", PERCENT_RANGE).describe("Lower bound of H^R CI");
const H_R_CI_UPPER: FieldSpec =
    FieldSpec::optional("h_r_ci_upper", PERCENT_RANGE).describe("Upper bound of H^R CI");
const WEIGHTS: FieldSpec = FieldSpec::required(
    "weights",
    FieldShape::DimensionMap {
        minimum: Some(Decimal::ZERO),
        maximum: Some(Decimal::ONE),
    },
)
.describe("Weights for each dimension, must sum to 1.0");
const TARGETS: FieldSpec = FieldSpec::required(
    "targets",
    FieldShape::DimensionMap {
        minimum: None,
        maximum: None,
    },
)
.describe("Sector targets (benchmarks)");
const EFFECTIVE_DATE: FieldSpec = FieldSpec::required("effective_date", FieldShape::Date);

/// Scoring configuration for one sector over one effective period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct SectorCalibration {
    sector_id: String,
    sector_name: String,
    h_r_baseline: Decimal,
    h_r_ci_lower: Option<Decimal>,
    h_r_ci_upper: Option<Decimal>,
    weights: DimensionMap,
    targets: DimensionMap,
    effective_date: NaiveDate,
}

impl SectorCalibration {
    pub fn sector_id(&self) -> &str {
        &self.sector_id
    }

    pub fn sector_name(&self) -> &str {
        &self.sector_name
    }

    pub fn h_r_baseline(&self) -> Decimal {
        self.h_r_baseline
    }

    pub fn h_r_ci_lower(&self) -> Option<Decimal> {
        self.h_r_ci_lower
    }

    pub fn h_r_ci_upper(&self) -> Option<Decimal> {
        self.h_r_ci_upper
    }

    pub fn weights(&self) -> &DimensionMap {
        &self.weights
    }

    pub fn targets(&self) -> &DimensionMap {
        &self.targets
    }

    pub fn effective_date(&self) -> NaiveDate {
        self.effective_date
    }

    /// Weight in effect for `dimension`. Every dimension is present once
    /// constructed.
    pub fn weight(&self, dimension: DimensionName) -> Decimal {
        self.weights
            .get(&dimension)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn target(&self, dimension: DimensionName) -> Decimal {
        self.targets
            .get(&dimension)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn weight_sum(&self) -> Decimal {
        checked_sum(self.weights.values()).unwrap_or(Decimal::MAX)
    }
}

/// Checks the weight-sum invariant over an already range-checked map.
pub fn check_weight_sum(weights: &DimensionMap) -> Result<(), FieldError> {
    let sum = checked_sum(weights.values()).unwrap_or(Decimal::MAX);
    if sums_to_one(sum) {
        Ok(())
    } else {
        Err(FieldError::CrossFieldInvariant {
            path: WEIGHTS.name.to_string(),
            rule: WEIGHT_SUM_RULE,
            actual: sum,
        })
    }
}

impl Contract for SectorCalibration {
    const ENTITY: &'static str = "SectorCalibration";
    const DESCRIPTION: &'static str = "Sector calibration including H^R and dimension weights.";
    const INVARIANTS: &'static [&'static str] = &[WEIGHT_SUM_RULE];

    fn fields() -> Vec<FieldSpec> {
        vec![
            SECTOR_ID,
            SECTOR_NAME,
            H_R_BASELINE,
            H_R_CI_LOWER,
            H_R_CI_UPPER,
            WEIGHTS,
            TARGETS,
            EFFECTIVE_DATE,
        ]
    }

    fn from_value(input: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(Self::ENTITY, input)?;
        let sector_id = reader.text(&SECTOR_ID);
        let sector_name = reader.text(&SECTOR_NAME);
        let h_r_baseline = reader.decimal(&H_R_BASELINE);
        let h_r_ci_lower = reader.decimal(&H_R_CI_LOWER);
        let h_r_ci_upper = reader.decimal(&H_R_CI_UPPER);
        let weights = reader.dimension_map(&WEIGHTS);
        let targets = reader.dimension_map(&TARGETS);
        let effective_date = reader.date(&EFFECTIVE_DATE);

        // The invariant is only meaningful once every field is individually valid.
        if reader.is_clean() {
            if let Some(Err(violation)) = weights.as_ref().map(check_weight_sum) {
                tracing::debug!(
                    tolerance = %weight_sum_tolerance(),
                    "{violation}"
                );
                reader.violations().push(violation);
            }
        }

        reader.finish(|| {
            Some(Self {
                sector_id: sector_id?,
                sector_name: sector_name?,
                h_r_baseline: h_r_baseline?,
                h_r_ci_lower,
                h_r_ci_upper,
                weights: weights?,
                targets: targets?,
                effective_date: effective_date?,
            })
        })
    }
}

impl TryFrom<Value> for SectorCalibration {
    type Error = ValidationErrors;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}
