//! Eligibility-based patient cost estimation.
//!
//! Policy, in priority order: select the benefit entry for the claim's
//! primary service category (falling back to the plan-level entry), use its
//! copay when present, otherwise exhaust the remaining deductible first and
//! apply coinsurance only to the remainder.
//!
//! Inactive coverage yields an error, never a zero-cost estimate.

use claimfix_types::eligibility::{BenefitEntry, EligibilitySnapshot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of the plan-level fallback entry.
pub const PLAN_CATEGORY: &str = "Plan";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimationError {
    #[error("coverage is inactive; no estimate produced")]
    InactiveCoverage,

    #[error("no benefit entry matches category {category:?} and no plan-level entry exists")]
    NoMatchingBenefit { category: String },
}

/// A computed patient-owed amount, with the math that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub amount: Decimal,

    /// Category of the benefit entry actually used (may be the plan-level
    /// fallback rather than the requested category).
    pub category: String,

    pub basis: EstimateBasis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EstimateBasis {
    /// Flat copay; independent of the claim total.
    Copay { copay: Decimal },

    /// Deductible exhausted first, coinsurance on the remainder.
    DeductibleCoinsurance {
        deductible_portion: Decimal,
        coinsurance_portion: Decimal,
    },
}

/// Estimate the patient-owed cost for a claim total against a snapshot.
pub fn estimate(
    claim_total: Decimal,
    category: &str,
    snapshot: &EligibilitySnapshot,
) -> Result<Estimate, EstimationError> {
    if !snapshot.active {
        return Err(EstimationError::InactiveCoverage);
    }

    let entry = select_entry(&snapshot.benefits, category).ok_or_else(|| {
        EstimationError::NoMatchingBenefit {
            category: category.to_string(),
        }
    })?;

    if let Some(copay) = entry.copay {
        return Ok(Estimate {
            amount: copay,
            category: entry.category.clone(),
            basis: EstimateBasis::Copay { copay },
        });
    }

    let deductible_remaining = entry.deductible_remaining.max(Decimal::ZERO);
    let deductible_portion = claim_total.min(deductible_remaining);
    let coinsurance_portion = (entry.coinsurance
        * (claim_total - deductible_remaining).max(Decimal::ZERO))
    .round_dp(2);

    Ok(Estimate {
        amount: deductible_portion + coinsurance_portion,
        category: entry.category.clone(),
        basis: EstimateBasis::DeductibleCoinsurance {
            deductible_portion,
            coinsurance_portion,
        },
    })
}

fn select_entry<'a>(benefits: &'a [BenefitEntry], category: &str) -> Option<&'a BenefitEntry> {
    benefits
        .iter()
        .find(|b| b.category == category)
        .or_else(|| benefits.iter().find(|b| b.category == PLAN_CATEGORY))
}
