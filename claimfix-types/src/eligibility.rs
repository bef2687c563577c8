use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetworkStatus {
    InNetwork,
    OutOfNetwork,
    #[default]
    Unknown,
}

/// How the snapshot payload was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceMode {
    #[default]
    Simulated,
    Live,
}

/// One benefit row from an eligibility response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitEntry {
    /// Service category, e.g. "Office Visit"; "Plan" is the plan-level row.
    pub category: String,

    /// Flat copay; when present it overrides deductible/coinsurance math.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copay: Option<Decimal>,

    /// Coinsurance fraction in [0, 1].
    pub coinsurance: Decimal,

    pub deductible_remaining: Decimal,

    #[serde(default)]
    pub auth_required: bool,
}

/// Point-in-time eligibility payload for a coverage.
///
/// Immutable once created: a new eligibility check produces a new snapshot
/// rather than mutating an old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilitySnapshot {
    pub coverage_id: i64,
    pub active: bool,

    #[serde(default)]
    pub network_status: NetworkStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_effective: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_termination: Option<NaiveDate>,

    #[serde(default)]
    pub benefits: Vec<BenefitEntry>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,

    #[serde(default)]
    pub source_mode: SourceMode,

    pub checked_at: DateTime<Utc>,
}
