use crate::fixers::Fixer;
use crate::pipeline::FixContext;
use claimfix_types::change::{ChangeKind, ProposedChange};
use claimfix_types::claim::Claim;
use claimfix_types::finding::{FindingCode, ValidationFinding};
use rust_decimal::Decimal;

/// Recomputes the claim total as the sum of `units x charge` across lines.
///
/// Declines when the line sum is zero; there is nothing to recompute from
/// and setting a zero total would only re-trigger the finding.
pub struct TotalChargeFixer;

impl Fixer for TotalChargeFixer {
    fn code(&self) -> FindingCode {
        FindingCode::TotalChargeZero
    }

    fn propose(
        &self,
        claim: &Claim,
        _findings: &[ValidationFinding],
        _ctx: &FixContext<'_>,
    ) -> Vec<ProposedChange> {
        let line_total = claim.line_total();
        if line_total <= Decimal::ZERO || claim.total_charge == line_total {
            return vec![];
        }

        vec![ProposedChange {
            reason: self.code(),
            kind: ChangeKind::SetTotalCharge { to: line_total },
            note: format!("total {} -> {}", claim.total_charge, line_total),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testutil::{claim, line};
    use claimfix_tables::RuleTables;
    use rust_decimal_macros::dec;

    #[test]
    fn recomputes_zero_total_from_lines() {
        let tables = RuleTables::builtin();
        let ctx = FixContext {
            tables: &tables,
            coverage: None,
        };
        let c = claim(vec![line(10, "99214", 2, dec!(75.00))], dec!(0));

        let changes = TotalChargeFixer.propose(&c, &[], &ctx);
        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes[0].kind,
            ChangeKind::SetTotalCharge { to: dec!(150.00) }
        );
    }

    #[test]
    fn recomputes_mismatched_total() {
        let tables = RuleTables::builtin();
        let ctx = FixContext {
            tables: &tables,
            coverage: None,
        };
        let c = claim(vec![line(10, "99214", 1, dec!(150.00))], dec!(120.00));
        let changes = TotalChargeFixer.propose(&c, &[], &ctx);
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn declines_with_no_billable_lines() {
        let tables = RuleTables::builtin();
        let ctx = FixContext {
            tables: &tables,
            coverage: None,
        };
        let c = claim(vec![], dec!(0));
        assert!(TotalChargeFixer.propose(&c, &[], &ctx).is_empty());
    }
}
