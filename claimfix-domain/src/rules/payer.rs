use crate::rules::Rule;
use claimfix_tables::RuleTables;
use claimfix_types::claim::Claim;
use claimfix_types::finding::{FindingCode, Severity, ValidationFinding};

/// A claim cannot go out without a payer name.
pub struct RequiredPayerNameRule;

impl Rule for RequiredPayerNameRule {
    fn code(&self) -> FindingCode {
        FindingCode::RequiredPayerName
    }

    fn evaluate(&self, claim: &Claim, _tables: &RuleTables) -> Vec<ValidationFinding> {
        if !claim.payer_name.trim().is_empty() {
            return vec![];
        }

        vec![ValidationFinding {
            claim_id: claim.id,
            code: self.code(),
            severity: Severity::Blocking,
            message: "Payer name is required on claim.".to_string(),
            suggestion: "Populate from the patient's most recent coverage.".to_string(),
            line_id: None,
        }]
    }
}
