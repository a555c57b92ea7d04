use chrono::NaiveDate;
use orgair_contracts::contracts::{
    AssessmentContext, Company, CompanyUpdate, Contract, ContractError, DimensionName,
    DimensionScoreResult, EntityKind, SectorCalibration, Vocabulary,
};
use orgair_contracts::tooling::SyntheticGenerator;
use serde_json::{json, Value};

fn validator(kind: EntityKind) -> jsonschema::Validator {
    jsonschema::validator_for(&kind.schema())
        .unwrap_or_else(|err| panic!("schema for {kind} compiles: {err}"))
}

fn assert_conforms(kind: EntityKind, instance: &Value) {
    let validator = validator(kind);
    let problems: Vec<String> = validator
        .iter_errors(instance)
        .map(|error| format!("{}: {error}", error.instance_path))
        .collect();
    assert!(problems.is_empty(), "{kind} instance violates its schema: {problems:?}");
}

#[test]
fn every_schema_compiles() {
    for kind in EntityKind::ordered() {
        validator(kind);
    }
}

#[test]
fn generated_instances_conform_to_their_schemas() {
    let mut generator = SyntheticGenerator::new(Some(99));
    for _ in 0..10 {
        let company = generator.company("financial_services").expect("valid company");
        assert_conforms(EntityKind::Company, &company.to_value().expect("serializes"));

        let input = generator.dimension_score_input().expect("valid input");
        assert_conforms(
            EntityKind::DimensionScoreInput,
            &input.to_value().expect("serializes"),
        );

        let calibration = generator
            .sector_calibration("financial_services", "Financial Services")
            .expect("valid calibration");
        assert_conforms(
            EntityKind::SectorCalibration,
            &calibration.to_value().expect("serializes"),
        );

        let context = AssessmentContext::automated(
            company.company_id(),
            NaiveDate::from_ymd_opt(2024, 7, 1).expect("valid date"),
        );
        let result = DimensionScoreResult::record(input, &calibration, context);
        assert_conforms(
            EntityKind::DimensionScoreResult,
            &result.to_value().expect("serializes"),
        );
    }
}

#[test]
fn patch_payloads_conform_to_the_update_schema() {
    let update = CompanyUpdate::from_value(&json!({ "status": "exited", "fund_id": "fund-ii" }))
        .expect("valid update");
    let wire = update.to_value().expect("serializes");
    assert_eq!(wire, json!({ "status": "exited", "fund_id": "fund-ii" }));
    assert_conforms(EntityKind::CompanyUpdate, &wire);
}

#[test]
fn schemas_reject_structurally_invalid_documents() {
    let input = validator(EntityKind::DimensionScoreInput);
    assert!(!input.is_valid(&json!({ "dimension": "talent", "score": 150 })));
    assert!(!input.is_valid(&json!({ "dimension": "innovation", "score": 50 })));
    assert!(!input.is_valid(&json!({ "score": 50 })));
    assert!(input.is_valid(&json!({ "dimension": "talent", "score": "50.5" })));

    let company = validator(EntityKind::Company);
    assert!(!company.is_valid(&json!({ "name": "", "sector_id": "energy" })));
    assert!(!company.is_valid(&json!({
        "name": "Acme",
        "sector_id": "energy",
        "status": "closed"
    })));
}

#[test]
fn weight_sum_is_outside_the_structural_schema() {
    let weights: serde_json::Map<String, Value> = DimensionName::VALUES
        .iter()
        .map(|name| (name.to_string(), json!("0.10")))
        .collect();
    let payload = json!({
        "sector_id": "energy",
        "sector_name": "Energy",
        "h_r_baseline": 60,
        "weights": weights,
        "targets": weights,
        "effective_date": "2024-01-01"
    });

    assert!(validator(EntityKind::SectorCalibration).is_valid(&payload));
    assert!(SectorCalibration::from_value(&payload).is_err());

    let schema = EntityKind::SectorCalibration.schema();
    assert_eq!(schema["x-invariants"][0], json!("dimension weights must sum to 1.0"));
}

#[test]
fn validate_reports_every_violation_in_one_pass() {
    let result = EntityKind::Company
        .validate(&json!({
            "name": "",
            "ticker": "A-VERY-LONG-TICKER-SYMBOL",
            "enterprise_value": "-1",
            "status": "closed",
            "created_at": "yesterday"
        }));
    let Err(ContractError::Invalid(errors)) = result else {
        panic!("expected validation errors, got {result:?}");
    };
    assert_eq!(errors.entity(), "Company");
    let paths: Vec<&str> = errors.errors().iter().map(|error| error.path()).collect();
    for expected in ["name", "ticker", "sector_id", "enterprise_value", "status", "created_at"] {
        assert!(paths.contains(&expected), "missing {expected} in {paths:?}");
    }
    assert!(errors.to_string().starts_with("6 validation errors for Company"));
    assert!(Company::from_value(&json!([])).is_err());
}

#[test]
fn schema_decimal_strings_agree_with_the_reader() {
    let schema = validator(EntityKind::DimensionScoreInput);
    for (score, accepted) in [
        (" +1e2 ", true),
        ("8.5E1", true),
        ("-0.004", true),
        ("77.777", true),
        ("1_000", false),
        (".5", false),
        ("5.", false),
        ("0x10", false),
        ("NaN", false),
    ] {
        let document = json!({ "dimension": "culture", "score": score });
        assert_eq!(schema.is_valid(&document), accepted, "schema on {score:?}");
        assert_eq!(
            EntityKind::DimensionScoreInput.validate(&document).is_ok(),
            accepted,
            "reader on {score:?}"
        );
    }
}
