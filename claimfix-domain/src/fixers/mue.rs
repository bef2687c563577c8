use crate::fixers::Fixer;
use crate::pipeline::FixContext;
use claimfix_types::change::{ChangeKind, ProposedChange};
use claimfix_types::claim::Claim;
use claimfix_types::finding::{FindingCode, ValidationFinding};

/// Caps line units at the configured per-code limit.
pub struct MueCapFixer;

impl Fixer for MueCapFixer {
    fn code(&self) -> FindingCode {
        FindingCode::MueExceeded
    }

    fn propose(
        &self,
        claim: &Claim,
        _findings: &[ValidationFinding],
        ctx: &FixContext<'_>,
    ) -> Vec<ProposedChange> {
        let mut changes = Vec::new();
        for line in &claim.lines {
            let Some(limit) = ctx.tables.mue_limit(&line.cpt) else {
                continue;
            };
            if line.units <= limit {
                continue;
            }

            changes.push(ProposedChange {
                reason: self.code(),
                kind: ChangeKind::CapLineUnits {
                    line_id: line.id,
                    to: limit,
                },
                note: format!("{} units {} -> {}", line.cpt, line.units, limit),
            });
        }
        changes
    }
}
