use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A professional claim as held by the store.
///
/// The claim owns its diagnosis and line collections exclusively; findings
/// and export records refer back to it by id only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: i64,
    pub patient_id: i64,

    #[serde(default)]
    pub payer_name: String,

    /// Place-of-service code, e.g. "11" for office.
    pub pos: String,

    pub total_charge: Decimal,

    #[serde(default)]
    pub diagnoses: Vec<Diagnosis>,

    #[serde(default)]
    pub lines: Vec<ClaimLine>,
}

impl Claim {
    /// Sum of `units x charge` across all lines.
    pub fn line_total(&self) -> Decimal {
        self.lines.iter().map(ClaimLine::extended_charge).sum()
    }

    pub fn line(&self, line_id: i64) -> Option<&ClaimLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }

    pub fn line_mut(&mut self, line_id: i64) -> Option<&mut ClaimLine> {
        self.lines.iter_mut().find(|l| l.id == line_id)
    }

    /// Procedure codes in line order (duplicates preserved).
    pub fn cpt_codes(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.cpt.as_str()).collect()
    }

    pub fn has_diagnosis_order(&self, order: u32) -> bool {
        self.diagnoses.iter().any(|d| d.order == order)
    }
}

/// Diagnosis entry; `order` is the 1-based pointer target used by lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub order: u32,
    pub code: String,
}

/// One billed procedure on a claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimLine {
    pub id: i64,

    /// CPT/HCPCS procedure code.
    pub cpt: String,

    pub units: u32,

    /// Charge per unit.
    pub charge: Decimal,

    /// 1-based indices into the claim's diagnosis list.
    #[serde(default)]
    pub dx_pointers: Vec<u32>,
}

impl ClaimLine {
    pub fn extended_charge(&self) -> Decimal {
        Decimal::from(self.units) * self.charge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(id: i64, cpt: &str, units: u32, charge: Decimal) -> ClaimLine {
        ClaimLine {
            id,
            cpt: cpt.to_string(),
            units,
            charge,
            dx_pointers: vec![1],
        }
    }

    #[test]
    fn line_total_sums_extended_charges() {
        let claim = Claim {
            id: 1,
            patient_id: 1,
            payer_name: "Sample Health".to_string(),
            pos: "11".to_string(),
            total_charge: dec!(350.00),
            diagnoses: vec![Diagnosis {
                order: 1,
                code: "E11.9".to_string(),
            }],
            lines: vec![
                line(10, "99214", 1, dec!(150.00)),
                line(11, "36415", 2, dec!(100.00)),
            ],
        };
        assert_eq!(claim.line_total(), dec!(350.00));
    }

    #[test]
    fn line_lookup_by_id() {
        let mut claim = Claim {
            id: 1,
            patient_id: 1,
            payer_name: String::new(),
            pos: "11".to_string(),
            total_charge: dec!(0),
            diagnoses: vec![],
            lines: vec![line(10, "99213", 1, dec!(90.00))],
        };
        assert!(claim.line(10).is_some());
        assert!(claim.line(99).is_none());
        claim.line_mut(10).unwrap().units = 3;
        assert_eq!(claim.line(10).unwrap().units, 3);
    }
}
