use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a validation finding.
///
/// A claim with at least one blocking finding is not submittable; advisory
/// findings surface in the workqueue but do not gate submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Blocking,
    Advisory,
}

/// The closed vocabulary of finding codes emitted by the rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingCode {
    NcciPair,
    PosConflict,
    MueExceeded,
    RequiredPayerName,
    TotalChargeZero,
    DxPointerInvalid,
}

impl FindingCode {
    pub fn as_str(self) -> &'static str {
        match self {
            FindingCode::NcciPair => "NCCI_PAIR",
            FindingCode::PosConflict => "POS_CONFLICT",
            FindingCode::MueExceeded => "MUE_EXCEEDED",
            FindingCode::RequiredPayerName => "REQUIRED_PAYER_NAME",
            FindingCode::TotalChargeZero => "TOTAL_CHARGE_ZERO",
            FindingCode::DxPointerInvalid => "DX_POINTER_INVALID",
        }
    }
}

impl fmt::Display for FindingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation result for a claim.
///
/// Findings are derived from a specific claim version and reference the
/// claim by id only; they are recomputed, never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFinding {
    pub claim_id: i64,
    pub code: FindingCode,
    pub severity: Severity,
    pub message: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub suggestion: String,

    /// The offending line, when the finding is line-scoped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_id: Option<i64>,
}

/// True when no finding blocks submission.
pub fn submittable(findings: &[ValidationFinding]) -> bool {
    findings.iter().all(|f| f.severity != Severity::Blocking)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(code: FindingCode, severity: Severity) -> ValidationFinding {
        ValidationFinding {
            claim_id: 1,
            code,
            severity,
            message: "m".to_string(),
            suggestion: String::new(),
            line_id: None,
        }
    }

    #[test]
    fn codes_serialize_screaming_snake() {
        let json = serde_json::to_string(&FindingCode::NcciPair).unwrap();
        assert_eq!(json, "\"NCCI_PAIR\"");
        let json = serde_json::to_string(&FindingCode::RequiredPayerName).unwrap();
        assert_eq!(json, "\"REQUIRED_PAYER_NAME\"");
    }

    #[test]
    fn display_matches_wire_form() {
        assert_eq!(FindingCode::TotalChargeZero.to_string(), "TOTAL_CHARGE_ZERO");
        assert_eq!(FindingCode::DxPointerInvalid.to_string(), "DX_POINTER_INVALID");
    }

    #[test]
    fn submittable_requires_no_blocking_findings() {
        assert!(submittable(&[]));
        assert!(submittable(&[finding(
            FindingCode::TotalChargeZero,
            Severity::Advisory
        )]));
        assert!(!submittable(&[
            finding(FindingCode::TotalChargeZero, Severity::Advisory),
            finding(FindingCode::NcciPair, Severity::Blocking),
        ]));
    }
}
