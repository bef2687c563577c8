use crate::rules::Rule;
use claimfix_tables::RuleTables;
use claimfix_types::claim::Claim;
use claimfix_types::finding::{FindingCode, Severity, ValidationFinding};

/// Mutually exclusive procedure pairs billed on the same claim.
pub struct NcciPairRule;

impl Rule for NcciPairRule {
    fn code(&self) -> FindingCode {
        FindingCode::NcciPair
    }

    fn evaluate(&self, claim: &Claim, tables: &RuleTables) -> Vec<ValidationFinding> {
        let codes = claim.cpt_codes();
        tables
            .edits_present(&codes)
            .into_iter()
            .map(|edit| ValidationFinding {
                claim_id: claim.id,
                code: self.code(),
                severity: Severity::Blocking,
                message: format!(
                    "{} conflicts with {} ({}).",
                    edit.primary, edit.secondary, edit.edit_type
                ),
                suggestion: "Remove the secondary code or apply an appropriate modifier."
                    .to_string(),
                line_id: None,
            })
            .collect()
    }
}
