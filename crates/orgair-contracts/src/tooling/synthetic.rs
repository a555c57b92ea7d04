use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};

use crate::contracts::ids::generate_id;
use crate::contracts::numeric::checked_sum;
use crate::contracts::{
    CompanyStatus, ConfidenceLevel, Contract, DimensionMap, DimensionName, DimensionScoreInput,
    OwnershipType, SectorCalibration, ValidationErrors, Vocabulary,
};
use crate::contracts::Company;

const NAME_STEMS: &[&str] = &[
    "Apex", "Northwind", "Bluefin", "Cobalt", "Meridian", "Summit", "Harbor", "Quantum",
    "Ironwood", "Lumen",
];
const NAME_SECTORS: &[&str] = &[
    "Analytics", "Systems", "Holdings", "Labs", "Industries", "Logistics", "Health",
];
const LEGAL_FORMS: &[&str] = &["Inc", "LLC", "Group", "Corp"];
const SUB_SECTORS: &[&str] = &["saas", "fintech", "medtech", "logistics", "retail"];
const CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "JPY", "CAD", "CHF"];
const RATIONALE_WORDS: &[&str] = &[
    "pipeline", "governance", "mature", "limited", "evidence", "strong", "adoption", "policy",
    "roadmap", "talent", "executive", "sponsorship", "data", "quality",
];

/// Weight normalization keeps this many fractional digits before the last
/// dimension absorbs the remainder.
const WEIGHT_SCALE: u32 = 6;

pub struct SyntheticGenerator {
    rng: StdRng,
}

impl SyntheticGenerator {
    /// A reproducible generator when `seed` is given, otherwise entropy-seeded.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.rng.gen_range(0..items.len())]
    }

    fn member<V: Vocabulary>(&mut self) -> V {
        *self.pick(V::ALL)
    }

    fn letters(&mut self, count: usize, upper: bool) -> String {
        let base = if upper { b'A' } else { b'a' };
        (0..count)
            .map(|_| (base + self.rng.gen_range(0..26u8)) as char)
            .collect()
    }

    fn days_ago(&mut self, min: i64, max: i64) -> Duration {
        Duration::days(self.rng.gen_range(min..=max))
    }

    /// Hundredths in `[min, max]` as a two-place decimal string.
    fn hundredths(&mut self, min: i64, max: i64) -> String {
        Decimal::new(self.rng.gen_range(min..=max), 2).to_string()
    }

    pub fn company_fields(&mut self, sector_id: &str) -> Value {
        let stem = *self.pick(NAME_STEMS);
        let sector = *self.pick(NAME_SECTORS);
        let form = *self.pick(LEGAL_FORMS);
        let ticker = format!("{}{:03}", self.letters(3, true), self.rng.gen_range(0..1000));
        let sub_sector_id = self
            .rng
            .gen_bool(0.3)
            .then(|| self.pick(SUB_SECTORS).to_string());
        let fund_id = self.rng.gen_bool(0.5).then(generate_id);
        let now = Utc::now();
        let ev_as_of = now.date_naive() - self.days_ago(0, 730);
        let created_at = now - self.days_ago(365, 1825);
        let updated_at = now - self.days_ago(0, 364);

        json!({
            "name": format!("{stem} {sector} {form}"),
            "ticker": ticker,
            "domain": format!("{}{}.com", stem.to_ascii_lowercase(), sector.to_ascii_lowercase()),
            "cik": self.letters(9, false),
            "sector_id": sector_id,
            "sub_sector_id": sub_sector_id,
            "enterprise_value": self.rng.gen_range(1_000_000u64..=10_000_000_000).to_string(),
            "ev_currency": *self.pick(CURRENCIES),
            "ev_as_of_date": ev_as_of.to_string(),
            "ownership_type": self.member::<OwnershipType>().as_str(),
            "fund_id": fund_id,
            "status": self.member::<CompanyStatus>().as_str(),
            "created_at": created_at.to_rfc3339(),
            "updated_at": updated_at.to_rfc3339(),
        })
    }

    pub fn company(&mut self, sector_id: &str) -> Result<Company, ValidationErrors> {
        let fields = self.company_fields(sector_id);
        Company::from_value(&fields)
    }

    pub fn dimension_score_input_fields(&mut self) -> Value {
        let rationale = self.rng.gen_bool(0.7).then(|| {
            let words: Vec<&str> = (0..10).map(|_| *self.pick(RATIONALE_WORDS)).collect();
            format!("{}.", words.join(" "))
        });
        let evidence_count = self.rng.gen_range(0..=3);
        let evidence: Vec<String> = (0..evidence_count).map(|_| generate_id()).collect();

        json!({
            "dimension": self.member::<DimensionName>().as_str(),
            "score": self.hundredths(0, 10_000),
            "confidence_level": self.member::<ConfidenceLevel>().as_str(),
            "rationale": rationale,
            "evidence_chunk_ids": evidence,
        })
    }

    pub fn dimension_score_input(&mut self) -> Result<DimensionScoreInput, ValidationErrors> {
        let fields = self.dimension_score_input_fields();
        DimensionScoreInput::from_value(&fields)
    }

    /// Random weights normalized so they sum to exactly 1: every weight but the
    /// last is rounded and the last takes the remainder.
    pub fn normalized_weights(&mut self) -> DimensionMap {
        let raw: Vec<Decimal> = DimensionName::ordered()
            .iter()
            .map(|_| Decimal::new(self.rng.gen_range(100_000..=1_000_000), WEIGHT_SCALE))
            .collect();
        let total = checked_sum(&raw).unwrap_or(Decimal::ONE);

        let mut weights = DimensionMap::new();
        let mut assigned = Decimal::ZERO;
        let (last, leading) = DimensionName::ordered()
            .split_last()
            .map(|(last, leading)| (*last, leading.to_vec()))
            .unwrap_or((DimensionName::Culture, Vec::new()));
        for (dimension, value) in leading.into_iter().zip(&raw) {
            let share = (*value / total).round_dp(WEIGHT_SCALE);
            assigned += share;
            weights.insert(dimension, share);
        }
        weights.insert(last, Decimal::ONE - assigned);
        weights
    }

    pub fn sector_calibration_fields(&mut self, sector_id: &str, sector_name: &str) -> Value {
        let weights = self.normalized_weights();
        let targets: Map<String, Value> = DimensionName::ordered()
            .iter()
            .map(|dimension| (dimension.to_string(), json!(self.hundredths(6_000, 8_500))))
            .collect();
        let ci_lower = self.rng.gen_bool(0.7).then(|| self.hundredths(4_500, 8_000));
        let ci_upper = self.rng.gen_bool(0.7).then(|| self.hundredths(6_000, 9_500));
        let effective_date = Utc::now().date_naive() - self.days_ago(0, 365);

        json!({
            "sector_id": sector_id,
            "sector_name": sector_name,
            "h_r_baseline": self.hundredths(5_000, 9_000),
            "h_r_ci_lower": ci_lower,
            "h_r_ci_upper": ci_upper,
            "weights": weights,
            "targets": targets,
            "effective_date": effective_date.to_string(),
        })
    }

    pub fn sector_calibration(
        &mut self,
        sector_id: &str,
        sector_name: &str,
    ) -> Result<SectorCalibration, ValidationErrors> {
        let fields = self.sector_calibration_fields(sector_id, sector_name);
        SectorCalibration::from_value(&fields)
    }
}
