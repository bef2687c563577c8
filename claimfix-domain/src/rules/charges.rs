use crate::rules::Rule;
use claimfix_tables::RuleTables;
use claimfix_types::claim::Claim;
use claimfix_types::finding::{FindingCode, Severity, ValidationFinding};
use rust_decimal::Decimal;

/// The claim total must be positive and match the line sum within the
/// configured tolerance. Both failure modes share `TOTAL_CHARGE_ZERO`,
/// matching the code vocabulary the workqueue exposes.
pub struct TotalChargeRule;

impl Rule for TotalChargeRule {
    fn code(&self) -> FindingCode {
        FindingCode::TotalChargeZero
    }

    fn evaluate(&self, claim: &Claim, tables: &RuleTables) -> Vec<ValidationFinding> {
        let line_total = claim.line_total();
        let zero = claim.total_charge <= Decimal::ZERO;
        let mismatch = (claim.total_charge - line_total).abs() > tables.charge_tolerance;
        if !zero && !mismatch {
            return vec![];
        }

        let message = if zero {
            "Total charge is zero or invalid.".to_string()
        } else {
            format!(
                "Total charge {} does not match line total {}.",
                claim.total_charge, line_total
            )
        };

        vec![ValidationFinding {
            claim_id: claim.id,
            code: self.code(),
            severity: Severity::Advisory,
            message,
            suggestion: "Recompute the total as the sum of units x charge across lines."
                .to_string(),
            line_id: None,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testutil::{claim, line};
    use rust_decimal_macros::dec;

    #[test]
    fn matching_total_passes() {
        let tables = RuleTables::builtin();
        let c = claim(vec![line(10, "99214", 2, dec!(75.00))], dec!(150.00));
        assert!(TotalChargeRule.evaluate(&c, &tables).is_empty());
    }

    #[test]
    fn zero_total_fires_advisory() {
        let tables = RuleTables::builtin();
        let c = claim(vec![line(10, "99214", 1, dec!(150.00))], dec!(0));
        let findings = TotalChargeRule.evaluate(&c, &tables);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Advisory);
        assert!(findings[0].message.contains("zero"));
    }

    #[test]
    fn nonzero_mismatch_reuses_the_same_code() {
        let tables = RuleTables::builtin();
        let c = claim(vec![line(10, "99214", 1, dec!(150.00))], dec!(120.00));
        let findings = TotalChargeRule.evaluate(&c, &tables);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, FindingCode::TotalChargeZero);
        assert!(findings[0].message.contains("does not match"));
    }

    #[test]
    fn tolerance_absorbs_rounding() {
        let tables = RuleTables::builtin();
        let c = claim(vec![line(10, "99214", 1, dec!(150.00))], dec!(150.005));
        assert!(TotalChargeRule.evaluate(&c, &tables).is_empty());
    }
}
