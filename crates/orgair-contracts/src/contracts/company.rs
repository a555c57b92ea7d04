use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields::{
    FieldDefault, FieldShape, FieldSpec, NON_EMPTY_TEXT, NON_NEGATIVE, UNBOUNDED_DECIMAL,
    UNBOUNDED_TEXT,
};
use super::ids::generate_id;
use super::reader::FieldReader;
use super::validation::ValidationErrors;
use super::vocabulary::{CompanyStatus, OwnershipType};
use super::Contract;

const NAME_SHAPE: FieldShape = FieldShape::text(Some(1), Some(200));
const TICKER_SHAPE: FieldShape = FieldShape::text(None, Some(20));
const DOMAIN_SHAPE: FieldShape = FieldShape::text(None, Some(200));
const CIK_SHAPE: FieldShape = FieldShape::text(None, Some(20));
const CURRENCY_SHAPE: FieldShape = FieldShape::text(None, Some(3));
const DEFAULT_CURRENCY: &str = "USD";

const COMPANY_ID: FieldSpec = FieldSpec::generated("company_id", NON_EMPTY_TEXT);
const NAME: FieldSpec = FieldSpec::required("name", NAME_SHAPE);
const TICKER: FieldSpec = FieldSpec::optional("ticker", TICKER_SHAPE);
const DOMAIN: FieldSpec = FieldSpec::optional("domain", DOMAIN_SHAPE);
const CIK: FieldSpec = FieldSpec::optional("cik", CIK_SHAPE);
const SECTOR_ID: FieldSpec =
    FieldSpec::required("sector_id", NON_EMPTY_TEXT).describe("Reference to sector calibration");
const SUB_SECTOR_ID: FieldSpec = FieldSpec::optional("sub_sector_id", UNBOUNDED_TEXT);
const ENTERPRISE_VALUE: FieldSpec = FieldSpec::optional("enterprise_value", NON_NEGATIVE);
const EV_CURRENCY: FieldSpec = FieldSpec::defaulted(
    "ev_currency",
    CURRENCY_SHAPE,
    FieldDefault::Text(DEFAULT_CURRENCY),
);
const EV_AS_OF_DATE: FieldSpec = FieldSpec::optional("ev_as_of_date", FieldShape::Date);
const STATUS: FieldSpec = FieldSpec::defaulted(
    "status",
    FieldShape::member_of::<CompanyStatus>(),
    FieldDefault::Text("active"),
);
const CREATE_OWNERSHIP_TYPE: FieldSpec =
    FieldSpec::required("ownership_type", FieldShape::member_of::<OwnershipType>());
const OWNERSHIP_TYPE: FieldSpec =
    FieldSpec::optional("ownership_type", FieldShape::member_of::<OwnershipType>());
const FUND_ID: FieldSpec = FieldSpec::optional("fund_id", UNBOUNDED_TEXT);
const CREATED_AT: FieldSpec = FieldSpec::generated("created_at", FieldShape::DateTime);
const UPDATED_AT: FieldSpec = FieldSpec::generated("updated_at", FieldShape::DateTime);

// PATCH variants: same constraints, nothing required.
const PATCH_NAME: FieldSpec = FieldSpec::optional("name", NAME_SHAPE);
const PATCH_SECTOR_ID: FieldSpec = FieldSpec::optional("sector_id", NON_EMPTY_TEXT);
const PATCH_EV_CURRENCY: FieldSpec = FieldSpec::optional("ev_currency", CURRENCY_SHAPE);
const PATCH_STATUS: FieldSpec =
    FieldSpec::optional("status", FieldShape::member_of::<CompanyStatus>());

const SECTOR_NAME: FieldSpec = FieldSpec::optional("sector_name", UNBOUNDED_TEXT);
const CURRENT_ORG_AIR: FieldSpec = FieldSpec::optional("current_org_air", UNBOUNDED_DECIMAL);
const LAST_SCORED_AT: FieldSpec = FieldSpec::optional("last_scored_at", FieldShape::DateTime);
const DOCUMENT_COUNT: FieldSpec =
    FieldSpec::defaulted("document_count", FieldShape::Count, FieldDefault::Integer(0));
const JOB_SIGNAL_COUNT: FieldSpec =
    FieldSpec::defaulted("job_signal_count", FieldShape::Count, FieldDefault::Integer(0));

/// Identity fields shared by every company shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyProfile {
    name: String,
    ticker: Option<String>,
    domain: Option<String>,
    cik: Option<String>,
    sector_id: String,
    sub_sector_id: Option<String>,
}

impl CompanyProfile {
    const FIELDS: [FieldSpec; 6] = [NAME, TICKER, DOMAIN, CIK, SECTOR_ID, SUB_SECTOR_ID];

    fn read(reader: &mut FieldReader<'_>) -> Option<Self> {
        let name = reader.text(&NAME);
        let ticker = reader.text(&TICKER);
        let domain = reader.text(&DOMAIN);
        let cik = reader.text(&CIK);
        let sector_id = reader.text(&SECTOR_ID);
        let sub_sector_id = reader.text(&SUB_SECTOR_ID);

        Some(Self {
            name: name?,
            ticker,
            domain,
            cik,
            sector_id: sector_id?,
            sub_sector_id,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ticker(&self) -> Option<&str> {
        self.ticker.as_deref()
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn cik(&self) -> Option<&str> {
        self.cik.as_deref()
    }

    pub fn sector_id(&self) -> &str {
        &self.sector_id
    }

    pub fn sub_sector_id(&self) -> Option<&str> {
        self.sub_sector_id.as_deref()
    }
}

/// User-supplied request for a new company. Ownership is mandatory here and
/// the record has no identity until it is promoted with
/// [`Company::from_create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct CompanyCreate {
    #[serde(flatten)]
    profile: CompanyProfile,
    enterprise_value: Option<Decimal>,
    ev_currency: String,
    ev_as_of_date: Option<NaiveDate>,
    ownership_type: OwnershipType,
    fund_id: Option<String>,
}

impl CompanyCreate {
    pub fn profile(&self) -> &CompanyProfile {
        &self.profile
    }

    pub fn enterprise_value(&self) -> Option<Decimal> {
        self.enterprise_value
    }

    pub fn ev_currency(&self) -> &str {
        &self.ev_currency
    }

    pub fn ev_as_of_date(&self) -> Option<NaiveDate> {
        self.ev_as_of_date
    }

    pub fn ownership_type(&self) -> OwnershipType {
        self.ownership_type
    }

    pub fn fund_id(&self) -> Option<&str> {
        self.fund_id.as_deref()
    }
}

impl Contract for CompanyCreate {
    const ENTITY: &'static str = "CompanyCreate";
    const DESCRIPTION: &'static str =
        "Schema for creating a company, including optional initial financial details.";

    fn fields() -> Vec<FieldSpec> {
        let mut fields = CompanyProfile::FIELDS.to_vec();
        fields.extend([
            ENTERPRISE_VALUE,
            EV_CURRENCY,
            EV_AS_OF_DATE,
            CREATE_OWNERSHIP_TYPE,
            FUND_ID,
        ]);
        fields
    }

    fn from_value(input: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(Self::ENTITY, input)?;
        let profile = CompanyProfile::read(&mut reader);
        let enterprise_value = reader.decimal(&ENTERPRISE_VALUE);
        let ev_currency = reader.text(&EV_CURRENCY);
        let ev_as_of_date = reader.date(&EV_AS_OF_DATE);
        let ownership_type = reader.member(&CREATE_OWNERSHIP_TYPE);
        let fund_id = reader.text(&FUND_ID);

        reader.finish(|| {
            Some(Self {
                profile: profile?,
                enterprise_value,
                ev_currency: ev_currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                ev_as_of_date,
                ownership_type: ownership_type?,
                fund_id,
            })
        })
    }
}

impl TryFrom<Value> for CompanyCreate {
    type Error = ValidationErrors;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

/// The full, system-populated company record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Company {
    company_id: String,
    #[serde(flatten)]
    profile: CompanyProfile,
    enterprise_value: Option<Decimal>,
    ev_currency: String,
    ev_as_of_date: Option<NaiveDate>,
    status: CompanyStatus,
    ownership_type: Option<OwnershipType>,
    fund_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Company {
    /// Promote a creation request into a record with a fresh identity and
    /// audit timestamps.
    pub fn from_create(create: CompanyCreate) -> Self {
        let now = Utc::now();
        Self {
            company_id: generate_id(),
            profile: create.profile,
            enterprise_value: create.enterprise_value,
            ev_currency: create.ev_currency,
            ev_as_of_date: create.ev_as_of_date,
            status: CompanyStatus::Active,
            ownership_type: Some(create.ownership_type),
            fund_id: create.fund_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update, returning the new record. Identity and
    /// `created_at` are preserved and `updated_at` is refreshed.
    pub fn apply(&self, update: &CompanyUpdate) -> Self {
        let mut next = self.clone();
        let profile = &mut next.profile;
        if let Some(name) = &update.name {
            profile.name = name.clone();
        }
        if let Some(ticker) = &update.ticker {
            profile.ticker = Some(ticker.clone());
        }
        if let Some(domain) = &update.domain {
            profile.domain = Some(domain.clone());
        }
        if let Some(cik) = &update.cik {
            profile.cik = Some(cik.clone());
        }
        if let Some(sector_id) = &update.sector_id {
            profile.sector_id = sector_id.clone();
        }
        if let Some(sub_sector_id) = &update.sub_sector_id {
            profile.sub_sector_id = Some(sub_sector_id.clone());
        }
        if let Some(value) = update.enterprise_value {
            next.enterprise_value = Some(value);
        }
        if let Some(currency) = &update.ev_currency {
            next.ev_currency = currency.clone();
        }
        if let Some(date) = update.ev_as_of_date {
            next.ev_as_of_date = Some(date);
        }
        if let Some(status) = update.status {
            next.status = status;
        }
        if let Some(ownership_type) = update.ownership_type {
            next.ownership_type = Some(ownership_type);
        }
        if let Some(fund_id) = &update.fund_id {
            next.fund_id = Some(fund_id.clone());
        }
        next.updated_at = Utc::now();
        next
    }

    fn read(reader: &mut FieldReader<'_>) -> Option<Self> {
        let company_id = reader.text(&COMPANY_ID);
        let profile = CompanyProfile::read(reader);
        let enterprise_value = reader.decimal(&ENTERPRISE_VALUE);
        let ev_currency = reader.text(&EV_CURRENCY);
        let ev_as_of_date = reader.date(&EV_AS_OF_DATE);
        let status = reader.member(&STATUS);
        let ownership_type = reader.member(&OWNERSHIP_TYPE);
        let fund_id = reader.text(&FUND_ID);
        let created_at = reader.datetime(&CREATED_AT);
        let updated_at = reader.datetime(&UPDATED_AT);

        if !reader.is_clean() {
            return None;
        }
        let now = Utc::now();
        Some(Self {
            company_id: company_id.unwrap_or_else(generate_id),
            profile: profile?,
            enterprise_value,
            ev_currency: ev_currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            ev_as_of_date,
            status: status.unwrap_or_default(),
            ownership_type,
            fund_id,
            created_at: created_at.unwrap_or(now),
            updated_at: updated_at.unwrap_or(now),
        })
    }

    pub fn company_id(&self) -> &str {
        &self.company_id
    }

    pub fn profile(&self) -> &CompanyProfile {
        &self.profile
    }

    pub fn name(&self) -> &str {
        self.profile.name()
    }

    pub fn sector_id(&self) -> &str {
        self.profile.sector_id()
    }

    pub fn enterprise_value(&self) -> Option<Decimal> {
        self.enterprise_value
    }

    pub fn ev_currency(&self) -> &str {
        &self.ev_currency
    }

    pub fn ev_as_of_date(&self) -> Option<NaiveDate> {
        self.ev_as_of_date
    }

    pub fn status(&self) -> CompanyStatus {
        self.status
    }

    pub fn ownership_type(&self) -> Option<OwnershipType> {
        self.ownership_type
    }

    pub fn fund_id(&self) -> Option<&str> {
        self.fund_id.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Contract for Company {
    const ENTITY: &'static str = "Company";
    const DESCRIPTION: &'static str =
        "Full company model with all fields, including system-generated ones.";

    fn fields() -> Vec<FieldSpec> {
        let mut fields = vec![COMPANY_ID];
        fields.extend(CompanyProfile::FIELDS);
        fields.extend([
            ENTERPRISE_VALUE,
            EV_CURRENCY,
            EV_AS_OF_DATE,
            STATUS,
            OWNERSHIP_TYPE,
            FUND_ID,
            CREATED_AT,
            UPDATED_AT,
        ]);
        fields
    }

    fn from_value(input: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(Self::ENTITY, input)?;
        let company = Self::read(&mut reader);
        reader.finish(|| company)
    }
}

impl TryFrom<Value> for Company {
    type Error = ValidationErrors;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

/// PATCH payload for an existing company. Absent (or `null`) fields leave the
/// record unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct CompanyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ticker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cik: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sector_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub_sector_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    enterprise_value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ev_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ev_as_of_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<CompanyStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ownership_type: Option<OwnershipType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fund_id: Option<String>,
}

impl CompanyUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn status(&self) -> Option<CompanyStatus> {
        self.status
    }
}

impl Contract for CompanyUpdate {
    const ENTITY: &'static str = "CompanyUpdate";
    const DESCRIPTION: &'static str =
        "Partial update for an existing company; absent fields are left unchanged.";

    fn fields() -> Vec<FieldSpec> {
        vec![
            PATCH_NAME,
            TICKER,
            DOMAIN,
            CIK,
            PATCH_SECTOR_ID,
            SUB_SECTOR_ID,
            ENTERPRISE_VALUE,
            PATCH_EV_CURRENCY,
            EV_AS_OF_DATE,
            PATCH_STATUS,
            OWNERSHIP_TYPE,
            FUND_ID,
        ]
    }

    fn from_value(input: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(Self::ENTITY, input)?;
        let update = Self {
            name: reader.text(&PATCH_NAME),
            ticker: reader.text(&TICKER),
            domain: reader.text(&DOMAIN),
            cik: reader.text(&CIK),
            sector_id: reader.text(&PATCH_SECTOR_ID),
            sub_sector_id: reader.text(&SUB_SECTOR_ID),
            enterprise_value: reader.decimal(&ENTERPRISE_VALUE),
            ev_currency: reader.text(&PATCH_EV_CURRENCY),
            ev_as_of_date: reader.date(&EV_AS_OF_DATE),
            status: reader.member(&PATCH_STATUS),
            ownership_type: reader.member(&OWNERSHIP_TYPE),
            fund_id: reader.text(&FUND_ID),
        };
        reader.finish(|| Some(update))
    }
}

impl TryFrom<Value> for CompanyUpdate {
    type Error = ValidationErrors;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

/// Company with related data for the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct CompanyDetail {
    #[serde(flatten)]
    company: Company,
    sector_name: Option<String>,
    current_org_air: Option<Decimal>,
    last_scored_at: Option<DateTime<Utc>>,
    document_count: u64,
    job_signal_count: u64,
}

impl CompanyDetail {
    pub fn company(&self) -> &Company {
        &self.company
    }

    pub fn sector_name(&self) -> Option<&str> {
        self.sector_name.as_deref()
    }

    pub fn current_org_air(&self) -> Option<Decimal> {
        self.current_org_air
    }

    pub fn last_scored_at(&self) -> Option<DateTime<Utc>> {
        self.last_scored_at
    }

    pub fn document_count(&self) -> u64 {
        self.document_count
    }

    pub fn job_signal_count(&self) -> u64 {
        self.job_signal_count
    }
}

impl Contract for CompanyDetail {
    const ENTITY: &'static str = "CompanyDetail";
    const DESCRIPTION: &'static str = "Company with related data for detail view.";

    fn fields() -> Vec<FieldSpec> {
        let mut fields = Company::fields();
        fields.extend([
            SECTOR_NAME,
            CURRENT_ORG_AIR,
            LAST_SCORED_AT,
            DOCUMENT_COUNT,
            JOB_SIGNAL_COUNT,
        ]);
        fields
    }

    fn from_value(input: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(Self::ENTITY, input)?;
        let company = Company::read(&mut reader);
        let sector_name = reader.text(&SECTOR_NAME);
        let current_org_air = reader.decimal(&CURRENT_ORG_AIR);
        let last_scored_at = reader.datetime(&LAST_SCORED_AT);
        let document_count = reader.count(&DOCUMENT_COUNT);
        let job_signal_count = reader.count(&JOB_SIGNAL_COUNT);

        reader.finish(|| {
            Some(Self {
                company: company?,
                sector_name,
                current_org_air,
                last_scored_at,
                document_count: document_count.unwrap_or(0),
                job_signal_count: job_signal_count.unwrap_or(0),
            })
        })
    }
}

impl TryFrom<Value> for CompanyDetail {
    type Error = ValidationErrors;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}
