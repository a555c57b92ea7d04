use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::calibration::SectorCalibration;
use super::fields::{FieldDefault, FieldShape, FieldSpec, NON_EMPTY_TEXT, UNBOUNDED_TEXT, UNIT_INTERVAL};
use super::ids::generate_id;
use super::reader::FieldReader;
use super::validation::ValidationErrors;
use super::vocabulary::{ConfidenceLevel, DimensionName, Vocabulary};
use super::Contract;

const DIMENSION: FieldSpec =
    FieldSpec::required("dimension", FieldShape::member_of::<DimensionName>());
const SCORE: FieldSpec = FieldSpec::required("score", FieldShape::Score);
const INPUT_CONFIDENCE: FieldSpec = FieldSpec::defaulted(
    "confidence_level",
    FieldShape::member_of::<ConfidenceLevel>(),
    FieldDefault::Text("medium"),
);
const RATIONALE: FieldSpec =
    FieldSpec::optional("rationale", FieldShape::text(None, Some(1000)));
const EVIDENCE_CHUNK_IDS: FieldSpec = FieldSpec::defaulted(
    "evidence_chunk_ids",
    FieldShape::TextList,
    FieldDefault::EmptyList,
);

const SCORE_ID: FieldSpec = FieldSpec::generated("score_id", NON_EMPTY_TEXT);
const COMPANY_ID: FieldSpec = FieldSpec::required("company_id", NON_EMPTY_TEXT);
const ASSESSMENT_ID: FieldSpec = FieldSpec::generated("assessment_id", NON_EMPTY_TEXT);
const WEIGHT: FieldSpec = FieldSpec::required("weight", UNIT_INTERVAL);
const RESULT_CONFIDENCE: FieldSpec = FieldSpec::required(
    "confidence_level",
    FieldShape::Pattern {
        pattern: ConfidenceLevel::PATTERN,
        values: ConfidenceLevel::VALUES,
    },
);
const ASSESSOR_ID: FieldSpec = FieldSpec::optional("assessor_id", UNBOUNDED_TEXT);
const ASSESSMENT_METHOD: FieldSpec = FieldSpec::required("assessment_method", UNBOUNDED_TEXT);
const ASSESSMENT_DATE: FieldSpec = FieldSpec::required("assessment_date", FieldShape::Date);
const EVIDENCE_COUNT: FieldSpec =
    FieldSpec::defaulted("evidence_count", FieldShape::Count, FieldDefault::Integer(0));
const CREATED_AT: FieldSpec = FieldSpec::generated("created_at", FieldShape::DateTime);

/// A single score submitted for one dimension. The score is rounded to two
/// fractional digits before its range is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct DimensionScoreInput {
    dimension: DimensionName,
    score: Decimal,
    confidence_level: ConfidenceLevel,
    rationale: Option<String>,
    evidence_chunk_ids: Vec<String>,
}

impl DimensionScoreInput {
    pub fn dimension(&self) -> DimensionName {
        self.dimension
    }

    pub fn score(&self) -> Decimal {
        self.score
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        self.confidence_level
    }

    pub fn rationale(&self) -> Option<&str> {
        self.rationale.as_deref()
    }

    pub fn evidence_chunk_ids(&self) -> &[String] {
        &self.evidence_chunk_ids
    }
}

impl Contract for DimensionScoreInput {
    const ENTITY: &'static str = "DimensionScoreInput";
    const DESCRIPTION: &'static str = "Input for a single dimension score, subject to validation.";

    fn fields() -> Vec<FieldSpec> {
        vec![
            DIMENSION,
            SCORE,
            INPUT_CONFIDENCE,
            RATIONALE,
            EVIDENCE_CHUNK_IDS,
        ]
    }

    fn from_value(input: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(Self::ENTITY, input)?;
        let dimension = reader.member(&DIMENSION);
        let score = reader.decimal(&SCORE);
        let confidence_level = reader.member(&INPUT_CONFIDENCE);
        let rationale = reader.text(&RATIONALE);
        let evidence_chunk_ids = reader.text_list(&EVIDENCE_CHUNK_IDS);

        reader.finish(|| {
            Some(Self {
                dimension: dimension?,
                score: score?,
                confidence_level: confidence_level.unwrap_or_default(),
                rationale,
                evidence_chunk_ids: evidence_chunk_ids.unwrap_or_default(),
            })
        })
    }
}

impl TryFrom<Value> for DimensionScoreInput {
    type Error = ValidationErrors;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

/// Attribution for a score being finalized into a [`DimensionScoreResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentContext {
    pub company_id: String,
    pub assessment_id: String,
    pub assessor_id: Option<String>,
    pub assessment_method: String,
    pub assessment_date: NaiveDate,
}

impl AssessmentContext {
    /// Context for an automated run with a freshly generated assessment id.
    pub fn automated(company_id: impl Into<String>, assessment_date: NaiveDate) -> Self {
        Self {
            company_id: company_id.into(),
            assessment_id: generate_id(),
            assessor_id: None,
            assessment_method: "automated".to_string(),
            assessment_date,
        }
    }
}

/// The recorded, attributed score for one dimension of one assessment.
/// Immutable; a re-assessment produces a new result under a new
/// `assessment_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct DimensionScoreResult {
    score_id: String,
    company_id: String,
    assessment_id: String,
    dimension: DimensionName,
    score: Decimal,
    weight: Decimal,
    confidence_level: ConfidenceLevel,
    assessor_id: Option<String>,
    assessment_method: String,
    assessment_date: NaiveDate,
    evidence_count: u64,
    created_at: DateTime<Utc>,
}

impl DimensionScoreResult {
    /// Finalize `input`, resolving the weight in effect from `calibration`.
    pub fn record(
        input: DimensionScoreInput,
        calibration: &SectorCalibration,
        context: AssessmentContext,
    ) -> Self {
        Self {
            score_id: generate_id(),
            company_id: context.company_id,
            assessment_id: context.assessment_id,
            dimension: input.dimension,
            score: input.score,
            weight: calibration.weight(input.dimension),
            confidence_level: input.confidence_level,
            assessor_id: context.assessor_id,
            assessment_method: context.assessment_method,
            assessment_date: context.assessment_date,
            evidence_count: input.evidence_chunk_ids.len() as u64,
            created_at: Utc::now(),
        }
    }

    pub fn score_id(&self) -> &str {
        &self.score_id
    }

    pub fn company_id(&self) -> &str {
        &self.company_id
    }

    pub fn assessment_id(&self) -> &str {
        &self.assessment_id
    }

    pub fn dimension(&self) -> DimensionName {
        self.dimension
    }

    pub fn score(&self) -> Decimal {
        self.score
    }

    pub fn weight(&self) -> Decimal {
        self.weight
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        self.confidence_level
    }

    /// `None` means the score was produced by automation.
    pub fn assessor_id(&self) -> Option<&str> {
        self.assessor_id.as_deref()
    }

    pub fn assessment_method(&self) -> &str {
        &self.assessment_method
    }

    pub fn assessment_date(&self) -> NaiveDate {
        self.assessment_date
    }

    pub fn evidence_count(&self) -> u64 {
        self.evidence_count
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Contract for DimensionScoreResult {
    const ENTITY: &'static str = "DimensionScoreResult";
    const DESCRIPTION: &'static str =
        "Stored dimension score with metadata for historical tracking.";

    fn fields() -> Vec<FieldSpec> {
        vec![
            SCORE_ID,
            COMPANY_ID,
            ASSESSMENT_ID,
            DIMENSION,
            SCORE,
            WEIGHT,
            RESULT_CONFIDENCE,
            ASSESSOR_ID,
            ASSESSMENT_METHOD,
            ASSESSMENT_DATE,
            EVIDENCE_COUNT,
            CREATED_AT,
        ]
    }

    fn from_value(input: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(Self::ENTITY, input)?;
        let score_id = reader.text(&SCORE_ID);
        let company_id = reader.text(&COMPANY_ID);
        let assessment_id = reader.text(&ASSESSMENT_ID);
        let dimension = reader.member(&DIMENSION);
        let score = reader.decimal(&SCORE);
        let weight = reader.decimal(&WEIGHT);
        let confidence_level = reader
            .text(&RESULT_CONFIDENCE)
            .and_then(|raw| ConfidenceLevel::parse(&raw).ok());
        let assessor_id = reader.text(&ASSESSOR_ID);
        let assessment_method = reader.text(&ASSESSMENT_METHOD);
        let assessment_date = reader.date(&ASSESSMENT_DATE);
        let evidence_count = reader.count(&EVIDENCE_COUNT);
        let created_at = reader.datetime(&CREATED_AT);

        reader.finish(|| {
            Some(Self {
                score_id: score_id.unwrap_or_else(generate_id),
                company_id: company_id?,
                assessment_id: assessment_id.unwrap_or_else(generate_id),
                dimension: dimension?,
                score: score?,
                weight: weight?,
                confidence_level: confidence_level?,
                assessor_id,
                assessment_method: assessment_method?,
                assessment_date: assessment_date?,
                evidence_count: evidence_count.unwrap_or(0),
                created_at: created_at.unwrap_or_else(Utc::now),
            })
        })
    }
}

impl TryFrom<Value> for DimensionScoreResult {
    type Error = ValidationErrors;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::validation::{Bound, ErrorKind, FieldError};
    use serde_json::json;

    fn result_payload() -> Value {
        json!({
            "company_id": "c-001",
            "assessment_id": "a-001",
            "dimension": "talent",
            "score": 64.5,
            "weight": "0.15",
            "confidence_level": "low",
            "assessment_method": "manual",
            "assessment_date": "2024-02-01",
            "evidence_count": 3
        })
    }

    #[test]
    fn input_rounds_before_range_check() {
        let input = DimensionScoreInput::from_value(
            &json!({"dimension": "talent", "score": 75.567}),
        )
        .expect("valid input");
        assert_eq!(input.score(), Decimal::new(7557, 2));
        assert_eq!(input.score().to_string(), "75.57");
        assert_eq!(input.confidence_level(), ConfidenceLevel::Medium);
        assert!(input.evidence_chunk_ids().is_empty());
    }

    #[test]
    fn values_rounding_into_range_are_accepted() {
        let input = DimensionScoreInput::from_value(
            &json!({"dimension": "culture", "score": "100.004"}),
        )
        .expect("rounds to 100.00");
        assert_eq!(input.score().to_string(), "100.00");

        let input = DimensionScoreInput::from_value(
            &json!({"dimension": "culture", "score": "-0.004"}),
        )
        .expect("rounds to zero");
        assert_eq!(input.score(), Decimal::ZERO);
    }

    #[test]
    fn values_rounding_out_of_range_are_rejected() {
        let errors = DimensionScoreInput::from_value(
            &json!({"dimension": "culture", "score": 100.005}),
        )
        .expect_err("rounds to 100.01");
        match &errors.errors()[0] {
            FieldError::FieldBounds {
                path,
                bound: Bound::Maximum { actual, .. },
            } => {
                assert_eq!(path, "score");
                assert_eq!(actual.to_string(), "100.01");
            }
            other => panic!("expected maximum bound violation, got {other:?}"),
        }
        assert!(errors.to_string().contains("less than or equal to 100"));
    }

    #[test]
    fn confidence_is_case_sensitive() {
        for level in ["HIGH", "very_high", ""] {
            let errors = DimensionScoreInput::from_value(
                &json!({"dimension": "talent", "score": 50, "confidence_level": level}),
            )
            .expect_err("invalid confidence");
            assert_eq!(errors.len(), 1);
            assert!(errors.has_kind(ErrorKind::FieldPattern));
        }
    }

    #[test]
    fn input_collects_type_and_length_errors() {
        let errors = DimensionScoreInput::from_value(&json!({
            "dimension": "innovation",
            "score": "high",
            "rationale": "r".repeat(1001),
            "evidence_chunk_ids": ["ev-1", 2]
        }))
        .expect_err("invalid input");
        let kinds: Vec<ErrorKind> = errors.errors().iter().map(FieldError::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ErrorKind::FieldPattern,
                ErrorKind::FieldType,
                ErrorKind::FieldBounds,
                ErrorKind::FieldType,
            ]
        );
        assert_eq!(errors.errors()[3].path(), "evidence_chunk_ids[1]");
    }

    #[test]
    fn result_requires_confidence_without_default() {
        let mut payload = result_payload();
        payload
            .as_object_mut()
            .expect("object payload")
            .remove("confidence_level");
        let errors = DimensionScoreResult::from_value(&payload).expect_err("confidence required");
        assert_eq!(errors.errors()[0].path(), "confidence_level");
        assert!(errors.has_kind(ErrorKind::MissingField));
    }

    #[test]
    fn result_enforces_weight_and_count_bounds() {
        let mut payload = result_payload();
        let fields = payload.as_object_mut().expect("object payload");
        fields.insert("weight".into(), json!(1.2));
        fields.insert("evidence_count".into(), json!(-1));
        fields.insert("confidence_level".into(), json!("Medium"));

        let errors = DimensionScoreResult::from_value(&payload).expect_err("invalid result");
        let paths: Vec<&str> = errors.errors().iter().map(|e| e.path()).collect();
        assert_eq!(paths, vec!["weight", "confidence_level", "evidence_count"]);
    }

    #[test]
    fn result_generates_missing_identifiers() {
        let result = DimensionScoreResult::from_value(&result_payload()).expect("valid result");
        assert_eq!(result.assessment_id(), "a-001");
        assert_eq!(result.score_id().len(), 36);
        assert_eq!(result.score().to_string(), "64.50");
        assert_eq!(result.assessor_id(), None);
        assert_eq!(result.evidence_count(), 3);
    }
}
