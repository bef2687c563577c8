use crate::fixers::Fixer;
use crate::pipeline::FixContext;
use claimfix_types::change::{ChangeKind, ProposedChange};
use claimfix_types::claim::Claim;
use claimfix_types::finding::{FindingCode, ValidationFinding};

/// Moves the claim to the office place-of-service when office E/M codes
/// are present.
pub struct PosConflictFixer;

impl Fixer for PosConflictFixer {
    fn code(&self) -> FindingCode {
        FindingCode::PosConflict
    }

    fn propose(
        &self,
        claim: &Claim,
        _findings: &[ValidationFinding],
        ctx: &FixContext<'_>,
    ) -> Vec<ProposedChange> {
        let office_pos = &ctx.tables.office_pos;
        let has_office_em = claim.lines.iter().any(|l| ctx.tables.is_office_em(&l.cpt));
        if !has_office_em || &claim.pos == office_pos {
            return vec![];
        }

        vec![ProposedChange {
            reason: self.code(),
            kind: ChangeKind::SetPlaceOfService {
                to: office_pos.clone(),
            },
            note: format!("office E/M present; POS {} -> {}", claim.pos, office_pos),
        }]
    }
}
