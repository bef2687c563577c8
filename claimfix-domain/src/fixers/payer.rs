use crate::fixers::Fixer;
use crate::pipeline::FixContext;
use claimfix_types::change::{ChangeKind, ProposedChange};
use claimfix_types::claim::Claim;
use claimfix_types::finding::{FindingCode, ValidationFinding};

/// Fills a blank payer name from the patient's latest coverage.
///
/// Declines when no coverage is known; the blocking finding then stays.
pub struct PayerNameFixer;

impl Fixer for PayerNameFixer {
    fn code(&self) -> FindingCode {
        FindingCode::RequiredPayerName
    }

    fn propose(
        &self,
        claim: &Claim,
        _findings: &[ValidationFinding],
        ctx: &FixContext<'_>,
    ) -> Vec<ProposedChange> {
        if !claim.payer_name.trim().is_empty() {
            return vec![];
        }
        let Some(coverage) = ctx.coverage else {
            return vec![];
        };
        if coverage.payer_name.trim().is_empty() {
            return vec![];
        }

        vec![ProposedChange {
            reason: self.code(),
            kind: ChangeKind::SetPayerName {
                to: coverage.payer_name.clone(),
            },
            note: format!("from coverage {}", coverage.id),
        }]
    }
}
