use crate::rules::Rule;
use claimfix_tables::RuleTables;
use claimfix_types::claim::Claim;
use claimfix_types::finding::{FindingCode, Severity, ValidationFinding};

/// Per-code maximum units per encounter.
pub struct MueExceededRule;

impl Rule for MueExceededRule {
    fn code(&self) -> FindingCode {
        FindingCode::MueExceeded
    }

    fn evaluate(&self, claim: &Claim, tables: &RuleTables) -> Vec<ValidationFinding> {
        let mut findings = Vec::new();
        for line in &claim.lines {
            let Some(limit) = tables.mue_limit(&line.cpt) else {
                continue;
            };
            if line.units <= limit {
                continue;
            }

            findings.push(ValidationFinding {
                claim_id: claim.id,
                code: self.code(),
                severity: Severity::Blocking,
                message: format!(
                    "Units {} for {} exceed limit {}.",
                    line.units, line.cpt, limit
                ),
                suggestion: format!("Reduce units to <= {limit} or split per policy."),
                line_id: Some(line.id),
            });
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testutil::{claim, line};
    use rust_decimal_macros::dec;

    #[test]
    fn units_over_limit_fire_per_line() {
        let tables = RuleTables::builtin();
        let c = claim(
            vec![
                line(10, "36415", 5, dec!(15.00)),
                line(11, "99214", 1, dec!(150.00)),
            ],
            dec!(225.00),
        );
        let findings = MueExceededRule.evaluate(&c, &tables);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line_id, Some(10));
        assert!(findings[0].message.contains("exceed limit 3"));
    }

    #[test]
    fn unknown_codes_and_units_at_limit_pass() {
        let tables = RuleTables::builtin();
        let c = claim(
            vec![
                line(10, "36415", 3, dec!(15.00)),
                line(11, "J3301", 10, dec!(5.00)),
            ],
            dec!(95.00),
        );
        assert!(MueExceededRule.evaluate(&c, &tables).is_empty());
    }
}
