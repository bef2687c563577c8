use crate::finding::FindingCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A deterministic transformation of a claim, keyed to the finding that
/// motivated it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedChange {
    /// The finding code this change resolves.
    pub reason: FindingCode,

    pub kind: ChangeKind,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
}

/// The closed set of claim transformations fixers may propose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeKind {
    SetPlaceOfService { to: String },
    SetPayerName { to: String },
    SetTotalCharge { to: Decimal },
    CapLineUnits { line_id: i64, to: u32 },
    RemoveLine { line_id: i64 },
}
