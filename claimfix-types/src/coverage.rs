use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Minimal patient demographics consumed by the export builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
}

/// An insurance coverage on file for a patient.
///
/// Read-only input: fixers pull the payer name from the latest coverage,
/// and eligibility snapshots hang off a coverage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    pub id: i64,
    pub patient_id: i64,
    pub payer_name: String,
    pub member_id: String,

    #[serde(default)]
    pub group_number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<NaiveDate>,

    /// self, spouse, child, other.
    #[serde(default)]
    pub relation_to_subscriber: String,

    /// Plan product, e.g. "PPO".
    #[serde(default)]
    pub plan_product: String,
}
