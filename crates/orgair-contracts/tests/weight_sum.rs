use orgair_contracts::contracts::{
    default_weights, Contract, DimensionName, ErrorKind, FieldError, SectorCalibration,
};
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};

fn calibration_with(weights: Value) -> Value {
    let targets: Map<String, Value> = DimensionName::ordered()
        .iter()
        .map(|dimension| (dimension.to_string(), json!("70.0")))
        .collect();
    json!({
        "sector_id": "healthcare",
        "sector_name": "Healthcare",
        "h_r_baseline": 72.5,
        "weights": weights,
        "targets": targets,
        "effective_date": "2024-06-30"
    })
}

/// Default weights with `data_infrastructure` shifted so the sum lands on `sum`.
fn weights_summing_to(sum: &str) -> Value {
    let shift = sum.parse::<Decimal>().expect("decimal literal") - Decimal::ONE;
    let mut weights = default_weights().clone();
    if let Some(weight) = weights.get_mut(&DimensionName::DataInfrastructure) {
        *weight += shift;
    }
    serde_json::to_value(weights).expect("weights serialize")
}

#[test]
fn sums_within_tolerance_are_accepted() {
    for sum in ["1", "1.001", "0.999", "1.0005", "0.9995"] {
        let calibration = SectorCalibration::from_value(&calibration_with(weights_summing_to(sum)))
            .unwrap_or_else(|err| panic!("sum {sum} should be accepted: {err}"));
        assert_eq!(
            calibration.weight_sum(),
            sum.parse::<Decimal>().expect("decimal literal")
        );
    }
}

#[test]
fn sums_outside_tolerance_are_rejected_with_the_observed_sum() {
    for sum in ["1.0011", "0.9989", "1.01", "0.8"] {
        let errors = SectorCalibration::from_value(&calibration_with(weights_summing_to(sum)))
            .expect_err("sum outside tolerance");
        assert_eq!(errors.len(), 1, "only the invariant should fail for {sum}");
        match &errors.errors()[0] {
            FieldError::CrossFieldInvariant { path, actual, .. } => {
                assert_eq!(path, "weights");
                assert_eq!(*actual, sum.parse::<Decimal>().expect("decimal literal"));
            }
            other => panic!("expected weight-sum violation for {sum}, got {other:?}"),
        }
    }
}

#[test]
fn weights_are_accepted_as_numbers_or_strings() {
    let weights = json!({
        "data_infrastructure": 0.25,
        "ai_governance": "0.20",
        "technology_stack": 0.15,
        "talent": "0.15",
        "leadership": 0.1,
        "use_case_portfolio": "0.10",
        "culture": 0.05
    });
    let calibration =
        SectorCalibration::from_value(&calibration_with(weights)).expect("valid calibration");
    assert_eq!(calibration.weight(DimensionName::Leadership), Decimal::new(1, 1));
    assert_eq!(calibration.weight_sum(), Decimal::ONE);
}

#[test]
fn missing_and_unknown_weights_are_reported_per_key() {
    let mut weights = serde_json::to_value(default_weights()).expect("weights serialize");
    let map = weights.as_object_mut().expect("object weights");
    map.remove("culture");
    map.insert("innovation".into(), json!("0.05"));

    let errors =
        SectorCalibration::from_value(&calibration_with(weights)).expect_err("bad weight keys");
    assert_eq!(errors.len(), 2);
    assert_eq!(
        errors.at("weights.culture").map(FieldError::kind).collect::<Vec<_>>(),
        vec![ErrorKind::MissingField]
    );
    assert_eq!(
        errors.at("weights.innovation").map(FieldError::kind).collect::<Vec<_>>(),
        vec![ErrorKind::FieldPattern]
    );
    assert!(!errors.has_kind(ErrorKind::CrossFieldInvariant));
}

#[test]
fn negative_weights_fail_the_range_check_not_the_invariant() {
    let mut weights = serde_json::to_value(default_weights()).expect("weights serialize");
    weights["culture"] = json!("-0.05");
    weights["talent"] = json!("0.25");

    let errors =
        SectorCalibration::from_value(&calibration_with(weights)).expect_err("negative weight");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors()[0].path(), "weights.culture");
    assert_eq!(errors.errors()[0].kind(), ErrorKind::FieldBounds);
}

#[test]
fn serialized_calibrations_deserialize_through_validation() {
    let payload = calibration_with(weights_summing_to("1"));
    let calibration = SectorCalibration::from_value(&payload).expect("valid calibration");

    let restored: SectorCalibration =
        serde_json::from_value(calibration.to_value().expect("serializes")).expect("round trip");
    assert_eq!(restored, calibration);

    let rejected = serde_json::from_value::<SectorCalibration>(calibration_with(
        weights_summing_to("0.9"),
    ));
    let message = rejected.expect_err("invariant enforced by serde").to_string();
    assert!(message.contains("must sum to 1.0"), "{message}");
}
