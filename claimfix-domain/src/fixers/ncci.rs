use crate::fixers::Fixer;
use crate::pipeline::FixContext;
use claimfix_types::change::{ChangeKind, ProposedChange};
use claimfix_types::claim::Claim;
use claimfix_types::finding::{FindingCode, ValidationFinding};
use std::collections::BTreeSet;

/// Removes the secondary line of a conflicting NCCI pair.
///
/// When more than one distinct secondary code is in play the right removal
/// is ambiguous, so the fixer declines and the findings stand for manual
/// review.
pub struct NcciSecondaryFixer;

impl Fixer for NcciSecondaryFixer {
    fn code(&self) -> FindingCode {
        FindingCode::NcciPair
    }

    fn propose(
        &self,
        claim: &Claim,
        _findings: &[ValidationFinding],
        ctx: &FixContext<'_>,
    ) -> Vec<ProposedChange> {
        let codes = claim.cpt_codes();
        let edits = ctx.tables.edits_present(&codes);
        if edits.is_empty() {
            return vec![];
        }

        let secondaries: BTreeSet<&str> = edits.iter().map(|e| e.secondary.as_str()).collect();
        if secondaries.len() > 1 {
            return vec![];
        }

        let edit = edits[0];
        claim
            .lines
            .iter()
            .filter(|l| l.cpt == edit.secondary)
            .map(|l| ProposedChange {
                reason: self.code(),
                kind: ChangeKind::RemoveLine { line_id: l.id },
                note: format!(
                    "NCCI {} vs {} ({})",
                    edit.primary, edit.secondary, edit.edit_type
                ),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testutil::{claim, line};
    use claimfix_tables::{NcciEdit, RuleTables};
    use rust_decimal_macros::dec;

    #[test]
    fn removes_the_single_secondary() {
        let tables = RuleTables::builtin();
        let ctx = FixContext {
            tables: &tables,
            coverage: None,
        };
        let c = claim(
            vec![
                line(10, "99214", 1, dec!(150.00)),
                line(11, "99215", 1, dec!(200.00)),
            ],
            dec!(350.00),
        );

        let changes = NcciSecondaryFixer.propose(&c, &[], &ctx);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::RemoveLine { line_id: 11 });
        assert!(changes[0].note.contains("99214 vs 99215"));
    }

    #[test]
    fn declines_on_ambiguous_secondaries() {
        let mut tables = RuleTables::builtin();
        tables.ncci_pairs.push(NcciEdit {
            primary: "99214".to_string(),
            secondary: "36415".to_string(),
            edit_type: "PAIR".to_string(),
        });
        let ctx = FixContext {
            tables: &tables,
            coverage: None,
        };
        let c = claim(
            vec![
                line(10, "99214", 1, dec!(150.00)),
                line(11, "99215", 1, dec!(200.00)),
                line(12, "36415", 1, dec!(15.00)),
            ],
            dec!(365.00),
        );
        assert!(NcciSecondaryFixer.propose(&c, &[], &ctx).is_empty());
    }
}
