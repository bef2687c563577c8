use claimfix_tables::RuleTables;
use claimfix_types::claim::Claim;
use claimfix_types::finding::{FindingCode, ValidationFinding};

mod charges;
mod dx;
mod mue;
mod ncci;
mod payer;
mod pos;

/// A pure predicate over a claim that emits zero or more findings.
pub trait Rule {
    /// The finding code this rule emits.
    fn code(&self) -> FindingCode;

    fn evaluate(&self, claim: &Claim, tables: &RuleTables) -> Vec<ValidationFinding>;
}

/// Rules in registration order. Findings always appear in this order, so
/// evaluation output is stable across runs.
pub fn builtin_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(payer::RequiredPayerNameRule),
        Box::new(pos::PosConflictRule),
        Box::new(charges::TotalChargeRule),
        Box::new(mue::MueExceededRule),
        Box::new(ncci::NcciPairRule),
        Box::new(dx::DxPointerRule),
    ]
}

/// An ordered collection of rules.
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSet {
    pub fn new() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }

    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// Evaluate every rule against the claim, in registration order.
    ///
    /// Pure and side-effect free; safe to call from any number of threads
    /// over distinct claims.
    pub fn evaluate(&self, claim: &Claim, tables: &RuleTables) -> Vec<ValidationFinding> {
        let mut findings = Vec::new();
        for rule in &self.rules {
            findings.extend(rule.evaluate(claim, tables));
        }
        findings
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use claimfix_types::claim::{Claim, ClaimLine, Diagnosis};
    use rust_decimal::Decimal;

    pub fn diagnosis(order: u32, code: &str) -> Diagnosis {
        Diagnosis {
            order,
            code: code.to_string(),
        }
    }

    pub fn line(id: i64, cpt: &str, units: u32, charge: Decimal) -> ClaimLine {
        ClaimLine {
            id,
            cpt: cpt.to_string(),
            units,
            charge,
            dx_pointers: vec![1],
        }
    }

    pub fn claim(lines: Vec<ClaimLine>, total: Decimal) -> Claim {
        Claim {
            id: 1,
            patient_id: 1,
            payer_name: "Sample Health".to_string(),
            pos: "11".to_string(),
            total_charge: total,
            diagnoses: vec![diagnosis(1, "E11.9")],
            lines,
        }
    }
}
