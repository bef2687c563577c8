use crate::pipeline::FixContext;
use claimfix_types::change::ProposedChange;
use claimfix_types::claim::Claim;
use claimfix_types::finding::{FindingCode, ValidationFinding};

mod mue;
mod ncci;
mod payer;
mod pos;
mod total;

/// A deterministic transformation resolving one finding code.
///
/// Fixers re-derive their facts from the working claim rather than trusting
/// the findings blindly, so a stale finding never produces a bad change.
/// Returning an empty vector declines the fix and leaves the finding in
/// place.
pub trait Fixer {
    /// The finding code this fixer resolves.
    fn code(&self) -> FindingCode;

    fn propose(
        &self,
        claim: &Claim,
        findings: &[ValidationFinding],
        ctx: &FixContext<'_>,
    ) -> Vec<ProposedChange>;
}

/// The closed set of built-in fixers, one per fixable finding code.
/// `DX_POINTER_INVALID` deliberately has none.
pub fn builtin_fixers() -> Vec<Box<dyn Fixer>> {
    vec![
        Box::new(pos::PosConflictFixer),
        Box::new(mue::MueCapFixer),
        Box::new(ncci::NcciSecondaryFixer),
        Box::new(payer::PayerNameFixer),
        Box::new(total::TotalChargeFixer),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_fixer_per_code() {
        let fixers = builtin_fixers();
        let mut codes: Vec<FindingCode> = fixers.iter().map(|f| f.code()).collect();
        let total = codes.len();
        codes.sort_by_key(|c| c.as_str());
        codes.dedup();
        assert_eq!(codes.len(), total);
        assert!(!codes.contains(&FindingCode::DxPointerInvalid));
    }
}
