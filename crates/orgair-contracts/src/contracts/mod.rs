//! Validated data contracts for companies, dimension scores and sector
//! calibrations.
//!
//! Every entity is constructed from a raw field map with
//! [`Contract::from_value`] (or through `serde`, which routes through the same
//! path) and is immutable afterwards.

pub mod calibration;
pub mod company;
pub mod dimension;
pub mod fields;
pub mod ids;
pub mod numeric;
pub mod reader;
pub mod schema;
pub mod validation;
pub mod vocabulary;

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub use calibration::{check_weight_sum, default_weights, DimensionMap, SectorCalibration};
pub use company::{Company, CompanyCreate, CompanyDetail, CompanyProfile, CompanyUpdate};
pub use dimension::{AssessmentContext, DimensionScoreInput, DimensionScoreResult};
pub use validation::{Bound, ErrorKind, FieldError, ValidationErrors};
pub use vocabulary::{
    CompanyStatus, ConfidenceLevel, DimensionName, OwnershipType, UnknownMember, Vocabulary,
};

use fields::FieldSpec;

/// An entity that can only exist in a validated state.
pub trait Contract: Serialize + Sized {
    const ENTITY: &'static str;
    const DESCRIPTION: &'static str;
    /// Cross-field rules that a structural schema cannot express.
    const INVARIANTS: &'static [&'static str] = &[];

    /// Structural metadata, in wire order.
    fn fields() -> Vec<FieldSpec>;

    /// Validate a raw field map, reporting every violation at once.
    fn from_value(input: &Value) -> Result<Self, ValidationErrors>;

    /// Wire form of a validated instance.
    fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Names every contract so tooling can address them generically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Company,
    CompanyCreate,
    CompanyUpdate,
    CompanyDetail,
    DimensionScoreInput,
    DimensionScoreResult,
    SectorCalibration,
}

impl EntityKind {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Company,
            Self::CompanyCreate,
            Self::CompanyUpdate,
            Self::CompanyDetail,
            Self::DimensionScoreInput,
            Self::DimensionScoreResult,
            Self::SectorCalibration,
        ]
    }

    /// Snake-case slug used on the command line and in export file names.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::CompanyCreate => "company_create",
            Self::CompanyUpdate => "company_update",
            Self::CompanyDetail => "company_detail",
            Self::DimensionScoreInput => "dimension_score_input",
            Self::DimensionScoreResult => "dimension_score_result",
            Self::SectorCalibration => "sector_calibration",
        }
    }

    pub fn schema(self) -> Value {
        match self {
            Self::Company => schema::schema_for::<Company>(),
            Self::CompanyCreate => schema::schema_for::<CompanyCreate>(),
            Self::CompanyUpdate => schema::schema_for::<CompanyUpdate>(),
            Self::CompanyDetail => schema::schema_for::<CompanyDetail>(),
            Self::DimensionScoreInput => schema::schema_for::<DimensionScoreInput>(),
            Self::DimensionScoreResult => schema::schema_for::<DimensionScoreResult>(),
            Self::SectorCalibration => schema::schema_for::<SectorCalibration>(),
        }
    }

    /// Construct the entity from `input` and return its canonical wire form.
    pub fn validate(self, input: &Value) -> Result<Value, ContractError> {
        match self {
            Self::Company => canonical::<Company>(input),
            Self::CompanyCreate => canonical::<CompanyCreate>(input),
            Self::CompanyUpdate => canonical::<CompanyUpdate>(input),
            Self::CompanyDetail => canonical::<CompanyDetail>(input),
            Self::DimensionScoreInput => canonical::<DimensionScoreInput>(input),
            Self::DimensionScoreResult => canonical::<DimensionScoreResult>(input),
            Self::SectorCalibration => canonical::<SectorCalibration>(input),
        }
    }
}

fn canonical<T: Contract>(input: &Value) -> Result<Value, ContractError> {
    let entity = T::from_value(input)?;
    Ok(entity.to_value()?)
}

#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
    #[error("failed to serialize canonical form: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity '{0}'")]
pub struct UnknownEntity(pub String);

impl FromStr for EntityKind {
    type Err = UnknownEntity;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::ordered()
            .into_iter()
            .find(|kind| kind.slug() == normalized)
            .ok_or_else(|| UnknownEntity(raw.to_string()))
    }
}
