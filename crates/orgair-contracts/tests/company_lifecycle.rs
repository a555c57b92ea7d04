use orgair_contracts::contracts::{
    Company, CompanyCreate, CompanyDetail, CompanyStatus, CompanyUpdate, Contract, ErrorKind,
    OwnershipType,
};
use rust_decimal::Decimal;
use serde_json::json;

fn create_request() -> CompanyCreate {
    CompanyCreate::from_value(&json!({
        "name": "Meridian Logistics LLC",
        "ticker": "MRDN",
        "sector_id": "logistics",
        "enterprise_value": "1250000000.00",
        "ev_as_of_date": "2024-04-01",
        "ownership_type": "portfolio",
        "fund_id": "fund-iii"
    }))
    .expect("valid create request")
}

#[test]
fn promoting_a_create_request_assigns_identity_and_defaults() {
    let company = Company::from_create(create_request());

    assert!(!company.company_id().is_empty());
    assert_eq!(company.name(), "Meridian Logistics LLC");
    assert_eq!(company.status(), CompanyStatus::Active);
    assert_eq!(company.ev_currency(), "USD");
    assert_eq!(company.ownership_type(), Some(OwnershipType::Portfolio));
    assert_eq!(company.created_at(), company.updated_at());
    assert_eq!(
        company.enterprise_value(),
        Some("1250000000".parse::<Decimal>().expect("decimal literal"))
    );
}

#[test]
fn applying_an_update_preserves_identity() {
    let company = Company::from_create(create_request());
    let update = CompanyUpdate::from_value(&json!({
        "status": "acquired",
        "ev_currency": "EUR",
        "ticker": null
    }))
    .expect("valid update");

    let updated = company.apply(&update);
    assert_eq!(updated.company_id(), company.company_id());
    assert_eq!(updated.created_at(), company.created_at());
    assert!(updated.updated_at() >= company.updated_at());
    assert_eq!(updated.status(), CompanyStatus::Acquired);
    assert_eq!(updated.ev_currency(), "EUR");
    assert_eq!(updated.profile().ticker(), Some("MRDN"), "null leaves the field unchanged");
    assert_eq!(company.status(), CompanyStatus::Active, "original is untouched");
}

#[test]
fn updates_are_validated_like_the_full_record() {
    let errors = CompanyUpdate::from_value(&json!({
        "name": "",
        "ev_currency": "EURO",
        "enterprise_value": -5,
        "status": "bankrupt"
    }))
    .expect_err("every field is invalid");

    let paths: Vec<&str> = errors.errors().iter().map(|error| error.path()).collect();
    assert_eq!(paths, vec!["name", "enterprise_value", "ev_currency", "status"]);
    assert!(errors.has_kind(ErrorKind::FieldBounds));
    assert!(errors.has_kind(ErrorKind::FieldPattern));
    assert!(CompanyUpdate::from_value(&json!({})).expect("empty patch").is_empty());
}

#[test]
fn create_requests_require_an_ownership_type() {
    let errors = CompanyCreate::from_value(&json!({
        "name": "Cobalt Systems",
        "sector_id": "technology"
    }))
    .expect_err("ownership type missing");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors()[0].path(), "ownership_type");
    assert_eq!(errors.errors()[0].kind(), ErrorKind::MissingField);
}

#[test]
fn detail_view_extends_the_record() {
    let company = Company::from_create(create_request());
    let mut wire = company.to_value().expect("serializes");
    let extra = json!({
        "sector_name": "Logistics",
        "current_org_air": "71.4",
        "last_scored_at": "2024-05-02T09:30:00Z",
        "document_count": 12
    });
    for (key, value) in extra.as_object().expect("object") {
        wire[key] = value.clone();
    }

    let detail = CompanyDetail::from_value(&wire).expect("valid detail");
    assert_eq!(detail.company(), &company);
    assert_eq!(detail.sector_name(), Some("Logistics"));
    assert_eq!(detail.document_count(), 12);
    assert_eq!(detail.job_signal_count(), 0);

    let flat = detail.to_value().expect("serializes");
    assert_eq!(flat["company_id"], json!(company.company_id()));
    assert_eq!(flat["current_org_air"], json!("71.4"));
}

#[test]
fn company_records_round_trip_through_serde() {
    let company = Company::from_create(create_request());
    let text = serde_json::to_string(&company).expect("serializes");
    let restored: Company = serde_json::from_str(&text).expect("deserializes");
    assert_eq!(restored, company);

    let invalid = serde_json::from_str::<Company>(r#"{"name": "", "sector_id": "x"}"#);
    assert!(invalid.is_err());
}
