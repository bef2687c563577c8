use crate::rules::Rule;
use claimfix_tables::RuleTables;
use claimfix_types::claim::Claim;
use claimfix_types::finding::{FindingCode, Severity, ValidationFinding};

/// Diagnosis pointers must reference existing diagnosis orders, and the
/// orders themselves must run 1..=n without gaps or duplicates.
///
/// No fixer is registered for this code; it always survives autofix.
pub struct DxPointerRule;

impl Rule for DxPointerRule {
    fn code(&self) -> FindingCode {
        FindingCode::DxPointerInvalid
    }

    fn evaluate(&self, claim: &Claim, _tables: &RuleTables) -> Vec<ValidationFinding> {
        let mut findings = Vec::new();

        let mut orders: Vec<u32> = claim.diagnoses.iter().map(|d| d.order).collect();
        orders.sort_unstable();
        let contiguous = orders
            .iter()
            .enumerate()
            .all(|(i, order)| *order == (i as u32) + 1);
        if !contiguous {
            findings.push(ValidationFinding {
                claim_id: claim.id,
                code: self.code(),
                severity: Severity::Blocking,
                message: "Diagnosis orders are not contiguous from 1.".to_string(),
                suggestion: "Renumber diagnoses 1..n and update line pointers.".to_string(),
                line_id: None,
            });
        }

        for line in &claim.lines {
            let missing: Vec<String> = line
                .dx_pointers
                .iter()
                .filter(|p| !claim.has_diagnosis_order(**p))
                .map(|p| p.to_string())
                .collect();
            if missing.is_empty() {
                continue;
            }

            findings.push(ValidationFinding {
                claim_id: claim.id,
                code: self.code(),
                severity: Severity::Blocking,
                message: format!(
                    "Line {} points at diagnosis {}, which does not exist.",
                    line.cpt,
                    missing.join(", ")
                ),
                suggestion: "Correct the line's diagnosis pointers.".to_string(),
                line_id: Some(line.id),
            });
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testutil::{claim, diagnosis, line};
    use rust_decimal_macros::dec;

    #[test]
    fn valid_pointers_pass() {
        let tables = RuleTables::builtin();
        let c = claim(vec![line(10, "99214", 1, dec!(150.00))], dec!(150.00));
        assert!(DxPointerRule.evaluate(&c, &tables).is_empty());
    }

    #[test]
    fn dangling_pointer_is_blocking() {
        let tables = RuleTables::builtin();
        let mut c = claim(vec![line(10, "99214", 1, dec!(150.00))], dec!(150.00));
        c.lines[0].dx_pointers = vec![1, 3];

        let findings = DxPointerRule.evaluate(&c, &tables);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line_id, Some(10));
        assert!(findings[0].message.contains("diagnosis 3"));
    }

    #[test]
    fn gapped_orders_fire() {
        let tables = RuleTables::builtin();
        let mut c = claim(vec![], dec!(0.00));
        c.diagnoses = vec![diagnosis(1, "E11.9"), diagnosis(3, "I10")];

        let findings = DxPointerRule.evaluate(&c, &tables);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("contiguous"));
    }
}
