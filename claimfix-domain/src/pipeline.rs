//! The autofix fixed-point loop.
//!
//! Evaluate, apply one fixer per finding code, re-evaluate, repeat. The
//! loop is bounded by [`MAX_FIX_CYCLES`]; an oscillating fixer can never
//! hang the engine, it only costs the `fixpoint_reached` flag.

use crate::fixers::{Fixer, builtin_fixers};
use crate::rules::RuleSet;
use claimfix_tables::RuleTables;
use claimfix_types::change::{ChangeKind, ProposedChange};
use claimfix_types::claim::Claim;
use claimfix_types::coverage::Coverage;
use claimfix_types::finding::{FindingCode, ValidationFinding};
use tracing::debug;

/// Hard cap on evaluate/fix cycles.
pub const MAX_FIX_CYCLES: usize = 5;

/// Read-only inputs a fix run needs beyond the claim itself.
pub struct FixContext<'a> {
    pub tables: &'a RuleTables,

    /// The patient's latest coverage, when known. Used by the payer-name
    /// fixer; `None` makes that fixer decline.
    pub coverage: Option<&'a Coverage>,
}

/// Result of one autofix run.
///
/// `claim` is the transformed working copy; the input claim is never
/// touched. In preview mode the caller discards it, in apply mode the
/// caller persists it, invalidating findings computed against the prior
/// version.
#[derive(Debug, Clone)]
pub struct FixOutcome {
    /// Findings against the claim as it was handed in.
    pub findings_before: Vec<ValidationFinding>,

    /// The claim after all applied changes.
    pub claim: Claim,

    /// Findings still present against the transformed claim. Only codes
    /// with no registered fixer, or whose fixer declined, appear here once
    /// a fixpoint is reached.
    pub remaining: Vec<ValidationFinding>,

    /// Changes applied, in application order across cycles.
    pub changes: Vec<ProposedChange>,

    pub cycles: usize,

    /// False when the cycle cap was hit with fixable findings still open.
    pub fixpoint_reached: bool,
}

/// Orchestrates rule evaluation and fixer application.
pub struct AutofixEngine {
    rules: RuleSet,
    fixers: Vec<Box<dyn Fixer>>,
}

impl Default for AutofixEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AutofixEngine {
    pub fn new() -> Self {
        Self {
            rules: RuleSet::new(),
            fixers: builtin_fixers(),
        }
    }

    pub fn with_parts(rules: RuleSet, fixers: Vec<Box<dyn Fixer>>) -> Self {
        Self { rules, fixers }
    }

    /// Evaluate the claim without fixing anything.
    pub fn scrub(&self, claim: &Claim, tables: &RuleTables) -> Vec<ValidationFinding> {
        self.rules.evaluate(claim, tables)
    }

    /// Run the fix loop against a working copy of `claim`.
    pub fn run(&self, claim: &Claim, ctx: &FixContext<'_>) -> FixOutcome {
        let findings_before = self.rules.evaluate(claim, ctx.tables);

        let mut working = claim.clone();
        let mut findings = findings_before.clone();
        let mut changes: Vec<ProposedChange> = Vec::new();
        let mut cycles = 0;
        let mut fixpoint_reached = false;

        while cycles < MAX_FIX_CYCLES {
            let proposals = self.propose_cycle(&working, &findings, ctx);
            if proposals.is_empty() {
                fixpoint_reached = true;
                break;
            }

            cycles += 1;
            for change in &proposals {
                apply_change(&mut working, &change.kind);
            }
            changes.extend(proposals);
            findings = self.rules.evaluate(&working, ctx.tables);
        }

        if !fixpoint_reached {
            // Cap hit; the run still counts as converged when nothing
            // fixable is left on the final state.
            fixpoint_reached = self.propose_cycle(&working, &findings, ctx).is_empty();
        }

        debug!(
            claim_id = claim.id,
            cycles,
            changes = changes.len(),
            remaining = findings.len(),
            fixpoint_reached,
            "autofix run finished"
        );

        FixOutcome {
            findings_before,
            claim: working,
            remaining: findings,
            changes,
            cycles,
            fixpoint_reached,
        }
    }

    /// One cycle's proposals: fixers run in finding order, at most one
    /// fixer per finding code.
    fn propose_cycle(
        &self,
        claim: &Claim,
        findings: &[ValidationFinding],
        ctx: &FixContext<'_>,
    ) -> Vec<ProposedChange> {
        let mut codes_in_order: Vec<FindingCode> = Vec::new();
        for finding in findings {
            if !codes_in_order.contains(&finding.code) {
                codes_in_order.push(finding.code);
            }
        }

        let mut proposals = Vec::new();
        for code in codes_in_order {
            let Some(fixer) = self.fixers.iter().find(|f| f.code() == code) else {
                continue;
            };
            let code_findings: Vec<ValidationFinding> = findings
                .iter()
                .filter(|f| f.code == code)
                .cloned()
                .collect();
            proposals.extend(fixer.propose(claim, &code_findings, ctx));
        }
        proposals
    }
}

/// Apply one change to a claim in place.
pub fn apply_change(claim: &mut Claim, kind: &ChangeKind) {
    match kind {
        ChangeKind::SetPlaceOfService { to } => claim.pos = to.clone(),
        ChangeKind::SetPayerName { to } => claim.payer_name = to.clone(),
        ChangeKind::SetTotalCharge { to } => claim.total_charge = *to,
        ChangeKind::CapLineUnits { line_id, to } => {
            if let Some(line) = claim.line_mut(*line_id) {
                line.units = *to;
            }
        }
        ChangeKind::RemoveLine { line_id } => {
            claim.lines.retain(|l| l.id != *line_id);
        }
    }
}
