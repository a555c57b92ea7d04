use orgair_contracts::contracts::{default_weights, EntityKind};
use orgair_contracts::tooling::SchemaExporter;
use serde_json::{json, Value};

fn sample(kind: EntityKind) -> Value {
    let targets = json!({
        "data_infrastructure": 70, "ai_governance": 65, "technology_stack": 72,
        "talent": 60, "leadership": 68, "use_case_portfolio": 55, "culture": 62
    });
    match kind {
        EntityKind::Company | EntityKind::CompanyDetail => json!({
            "name": "Harbor Health Group",
            "sector_id": "healthcare",
            "enterprise_value": 850000000,
            "ownership_type": "target",
            "document_count": 4
        }),
        EntityKind::CompanyCreate => json!({
            "name": "Harbor Health Group",
            "sector_id": "healthcare",
            "ownership_type": "target"
        }),
        EntityKind::CompanyUpdate => json!({ "domain": "harborhealth.com", "cik": null }),
        EntityKind::DimensionScoreInput => json!({
            "dimension": "leadership",
            "score": 81.456,
            "rationale": "Executive sponsor in place."
        }),
        EntityKind::DimensionScoreResult => json!({
            "company_id": "company-7",
            "dimension": "leadership",
            "score": "81.456",
            "weight": 0.1,
            "confidence_level": "medium",
            "assessment_method": "hybrid",
            "assessment_date": "2024-08-12"
        }),
        EntityKind::SectorCalibration => json!({
            "sector_id": "healthcare",
            "sector_name": "Healthcare",
            "h_r_baseline": "70.5",
            "weights": default_weights(),
            "targets": targets,
            "effective_date": "2024-01-01"
        }),
    }
}

#[test]
fn canonical_forms_are_fixed_points() {
    for kind in EntityKind::ordered() {
        let first = kind
            .validate(&sample(kind))
            .unwrap_or_else(|err| panic!("{kind} sample is valid: {err}"));
        let second = kind
            .validate(&first)
            .unwrap_or_else(|err| panic!("{kind} canonical form is valid: {err}"));
        assert_eq!(first, second, "{kind} canonical form changed on re-validation");
    }
}

#[test]
fn canonical_forms_normalize_scores_and_defaults() {
    let input = EntityKind::DimensionScoreInput
        .validate(&sample(EntityKind::DimensionScoreInput))
        .expect("valid input");
    assert_eq!(input["score"], json!("81.46"));
    assert_eq!(input["confidence_level"], json!("medium"));
    assert_eq!(input["evidence_chunk_ids"], json!([]));

    let company = EntityKind::Company
        .validate(&sample(EntityKind::Company))
        .expect("valid company");
    assert_eq!(company["status"], json!("active"));
    assert_eq!(company["ev_currency"], json!("USD"));
    assert!(company.get("document_count").is_none());

    let detail = EntityKind::CompanyDetail
        .validate(&sample(EntityKind::CompanyDetail))
        .expect("valid detail");
    assert_eq!(detail["document_count"], json!(4));
    assert_eq!(detail["job_signal_count"], json!(0));

    let update = EntityKind::CompanyUpdate
        .validate(&sample(EntityKind::CompanyUpdate))
        .expect("valid update");
    assert_eq!(update, json!({ "domain": "harborhealth.com" }));
}

#[test]
fn exported_schemas_match_the_registry() {
    let dir = tempfile::tempdir().expect("temp dir");
    let exporter = SchemaExporter::new(dir.path(), "v1");
    let written = exporter.export_all().expect("export succeeds");
    assert_eq!(written.len(), EntityKind::ordered().len());

    for (path, kind) in written.iter().zip(EntityKind::ordered()) {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .expect("utf-8 file name");
        assert_eq!(name, format!("{}_v1.json", kind.slug()));
        let schema: Value = serde_json::from_str(
            &std::fs::read_to_string(path).expect("schema readable"),
        )
        .expect("schema is json");
        assert_eq!(schema["title"], kind.schema()["title"]);
    }
}
