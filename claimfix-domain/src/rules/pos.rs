use crate::rules::Rule;
use claimfix_tables::RuleTables;
use claimfix_types::claim::Claim;
use claimfix_types::finding::{FindingCode, Severity, ValidationFinding};

/// Office E/M codes may only be billed with the office place-of-service.
pub struct PosConflictRule;

impl Rule for PosConflictRule {
    fn code(&self) -> FindingCode {
        FindingCode::PosConflict
    }

    fn evaluate(&self, claim: &Claim, tables: &RuleTables) -> Vec<ValidationFinding> {
        if claim.pos == tables.office_pos {
            return vec![];
        }

        claim
            .lines
            .iter()
            .filter(|line| tables.is_office_em(&line.cpt))
            .map(|line| ValidationFinding {
                claim_id: claim.id,
                code: self.code(),
                severity: Severity::Blocking,
                message: format!(
                    "Office E/M {} cannot be used with POS {}.",
                    line.cpt, claim.pos
                ),
                suggestion: format!(
                    "Set place-of-service to {} or correct the E/M code.",
                    tables.office_pos
                ),
                line_id: Some(line.id),
            })
            .collect()
    }
}
