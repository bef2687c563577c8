//! The scrub/autofix/estimate/export pipelines, wired to the ports.

use crate::error::CoreError;
use crate::ports::{ClaimStore, CoverageSource, EligibilitySource, ExportStore, PatientSource};
use anyhow::Context;
use camino::Utf8Path;
use chrono::{DateTime, Utc};
use claimfix_domain::{AutofixEngine, FixContext, FixOutcome};
use claimfix_estimate::{Estimate, PLAN_CATEGORY, estimate};
use claimfix_export::{mark_failed, mark_sent, write_export};
use claimfix_tables::RuleTables;
use claimfix_types::change::ProposedChange;
use claimfix_types::claim::Claim;
use claimfix_types::export::{ExportRecord, ExportStatus};
use claimfix_types::finding::{Severity, ValidationFinding, submittable};
use fs_err as fs;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Category assigned to claims carrying an office E/M line.
pub const OFFICE_VISIT_CATEGORY: &str = "Office Visit";

/// Everything a pipeline call needs, borrowed for the duration of the call.
#[derive(Clone, Copy)]
pub struct Deps<'a> {
    pub claims: &'a dyn ClaimStore,
    pub patients: &'a dyn PatientSource,
    pub coverages: &'a dyn CoverageSource,
    pub eligibility: &'a dyn EligibilitySource,
    pub exports: &'a dyn ExportStore,
    pub tables: &'a RuleTables,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AutofixMode {
    Preview,
    Apply,
}

/// Serialized result of a preview or apply run.
#[derive(Debug, Clone, Serialize)]
pub struct AutofixOutcome {
    pub claim_id: i64,
    pub mode: AutofixMode,

    /// Findings against the claim as stored when the run started.
    pub findings: Vec<ValidationFinding>,

    /// The transformed claim. Persisted only in apply mode.
    pub proposed: Claim,

    pub remaining: Vec<ValidationFinding>,
    pub changes: Vec<ProposedChange>,
    pub cycles: usize,
    pub fixpoint_reached: bool,

    /// True when no blocking finding survives on the transformed claim.
    pub submittable: bool,

    /// Unified diff of the claim JSON, before vs after.
    pub patch: String,
}

/// Per-process apply exclusion: at most one apply in flight per claim id.
///
/// `acquire` fails fast with [`CoreError::ConcurrentApply`] rather than
/// queueing; the caller is expected to retry.
#[derive(Debug, Default)]
pub struct ApplyLocks {
    in_flight: Mutex<BTreeSet<i64>>,
}

impl ApplyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, claim_id: i64) -> Result<ApplyPermit<'_>, CoreError> {
        let mut in_flight = self.in_flight.lock().expect("lock apply set");
        if !in_flight.insert(claim_id) {
            return Err(CoreError::ConcurrentApply(claim_id));
        }
        Ok(ApplyPermit {
            locks: self,
            claim_id,
        })
    }
}

/// Releases the claim's apply slot on drop.
pub struct ApplyPermit<'a> {
    locks: &'a ApplyLocks,
    claim_id: i64,
}

impl Drop for ApplyPermit<'_> {
    fn drop(&mut self) {
        self.locks
            .in_flight
            .lock()
            .expect("lock apply set")
            .remove(&self.claim_id);
    }
}

/// Evaluate a claim without proposing or applying fixes.
pub fn run_scrub(deps: &Deps<'_>, claim_id: i64) -> Result<Vec<ValidationFinding>, CoreError> {
    let claim = load_claim(deps, claim_id)?;
    Ok(AutofixEngine::new().scrub(&claim, deps.tables))
}

/// Autofix preview: the stored claim is never touched.
pub fn run_preview(deps: &Deps<'_>, claim_id: i64) -> Result<AutofixOutcome, CoreError> {
    let claim = load_claim(deps, claim_id)?;
    let outcome = run_engine(deps, &claim)?;
    Ok(to_outcome(AutofixMode::Preview, &claim, outcome))
}

/// Autofix apply: persists the transformed claim as the new stored state,
/// invalidating findings computed against the prior version.
pub fn run_apply(
    deps: &Deps<'_>,
    locks: &ApplyLocks,
    claim_id: i64,
) -> Result<AutofixOutcome, CoreError> {
    let _permit = locks.acquire(claim_id)?;

    let claim = load_claim(deps, claim_id)?;
    let outcome = run_engine(deps, &claim)?;
    deps.claims.put_claim(outcome.claim.clone())?;

    info!(
        claim_id,
        changes = outcome.changes.len(),
        remaining = outcome.remaining.len(),
        "applied autofix"
    );
    Ok(to_outcome(AutofixMode::Apply, &claim, outcome))
}

#[derive(Debug, Clone, Serialize)]
pub struct EstimateOutcome {
    pub claim_id: i64,
    pub category: String,
    pub estimate: Estimate,
}

/// Patient cost estimate for a claim against the latest eligibility
/// snapshot on file.
pub fn run_estimate(deps: &Deps<'_>, claim_id: i64) -> Result<EstimateOutcome, CoreError> {
    let claim = load_claim(deps, claim_id)?;
    let snapshot = deps
        .eligibility
        .latest_snapshot(claim.patient_id)?
        .ok_or(CoreError::SnapshotNotFound(claim.patient_id))?;

    let category = primary_service_category(&claim, deps.tables);
    let estimate = estimate(claim.total_charge, category, &snapshot)?;
    Ok(EstimateOutcome {
        claim_id,
        category: category.to_string(),
        estimate,
    })
}

/// The claim's primary service category for benefit selection.
pub fn primary_service_category(claim: &Claim, tables: &RuleTables) -> &'static str {
    if claim.lines.iter().any(|l| tables.is_office_em(&l.cpt)) {
        OFFICE_VISIT_CATEGORY
    } else {
        PLAN_CATEGORY
    }
}

/// Generate and queue a new export file for a claim.
pub fn run_export(
    deps: &Deps<'_>,
    exports_dir: &Utf8Path,
    claim_id: i64,
    now: DateTime<Utc>,
) -> Result<ExportRecord, CoreError> {
    let claim = load_claim(deps, claim_id)?;
    let patient = deps
        .patients
        .patient(claim.patient_id)?
        .ok_or(CoreError::PatientNotFound(claim.patient_id))?;
    let coverage = deps.coverages.latest_for_patient(claim.patient_id)?;

    let record = write_export(exports_dir, &claim, &patient, coverage.as_ref(), now)?;
    deps.exports.insert_export(record.clone())?;
    Ok(record)
}

/// Result reported by the external delivery collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Acknowledged,
    Failed,
}

/// Drive the QUEUED -> SENT/FAILED transition from a delivery result.
pub fn resolve_export(
    deps: &Deps<'_>,
    export_id: Uuid,
    outcome: DeliveryOutcome,
) -> Result<ExportRecord, CoreError> {
    let mut record = deps
        .exports
        .get_export(export_id)?
        .ok_or(CoreError::ExportNotFound(export_id))?;

    match outcome {
        DeliveryOutcome::Acknowledged => mark_sent(&mut record)?,
        DeliveryOutcome::Failed => mark_failed(&mut record)?,
    }
    deps.exports.put_export(record.clone())?;
    Ok(record)
}

/// File bytes for a SENT export record.
pub fn download_export(deps: &Deps<'_>, export_id: Uuid) -> Result<Vec<u8>, CoreError> {
    let record = deps
        .exports
        .get_export(export_id)?
        .ok_or(CoreError::ExportNotFound(export_id))?;
    if record.status != ExportStatus::Sent {
        return Err(CoreError::ExportNotSent(export_id));
    }

    let bytes = fs::read(&record.file_path)
        .with_context(|| format!("read export file {}", record.file_path))?;
    Ok(bytes)
}

/// One row of the scrub workqueue: a claim with open findings.
#[derive(Debug, Clone, Serialize)]
pub struct WorkqueueRow {
    pub claim_id: i64,
    pub patient_id: i64,
    pub payer_name: String,
    pub pos: String,
    pub total_charge: Decimal,
    pub errors: Vec<ValidationFinding>,
    pub warnings: Vec<ValidationFinding>,
}

/// Claims with at least one finding, freshly scrubbed, ordered by id.
pub fn run_workqueue(deps: &Deps<'_>) -> Result<Vec<WorkqueueRow>, CoreError> {
    let engine = AutofixEngine::new();
    let mut rows = Vec::new();

    for claim in deps.claims.list_claims()? {
        let findings = engine.scrub(&claim, deps.tables);
        if findings.is_empty() {
            continue;
        }

        let (errors, warnings): (Vec<_>, Vec<_>) = findings
            .into_iter()
            .partition(|f| f.severity == Severity::Blocking);
        rows.push(WorkqueueRow {
            claim_id: claim.id,
            patient_id: claim.patient_id,
            payer_name: claim.payer_name.clone(),
            pos: claim.pos.clone(),
            total_charge: claim.total_charge,
            errors,
            warnings,
        });
    }
    Ok(rows)
}

fn load_claim(deps: &Deps<'_>, claim_id: i64) -> Result<Claim, CoreError> {
    deps.claims
        .get_claim(claim_id)?
        .ok_or(CoreError::ClaimNotFound(claim_id))
}

fn run_engine(deps: &Deps<'_>, claim: &Claim) -> Result<FixOutcome, CoreError> {
    let coverage = deps.coverages.latest_for_patient(claim.patient_id)?;
    let ctx = FixContext {
        tables: deps.tables,
        coverage: coverage.as_ref(),
    };
    debug!(claim_id = claim.id, "running autofix engine");
    Ok(AutofixEngine::new().run(claim, &ctx))
}

fn to_outcome(mode: AutofixMode, before: &Claim, outcome: FixOutcome) -> AutofixOutcome {
    let patch = claim_patch(before, &outcome.claim);
    let submittable = submittable(&outcome.remaining);
    AutofixOutcome {
        claim_id: before.id,
        mode,
        findings: outcome.findings_before,
        proposed: outcome.claim,
        remaining: outcome.remaining,
        changes: outcome.changes,
        cycles: outcome.cycles,
        fixpoint_reached: outcome.fixpoint_reached,
        submittable,
        patch,
    }
}

/// Unified diff of the pretty-printed claim JSON.
fn claim_patch(before: &Claim, after: &Claim) -> String {
    let original = claim_json(before);
    let changed = claim_json(after);
    if original == changed {
        return String::new();
    }
    diffy::create_patch(&original, &changed).to_string()
}

fn claim_json(claim: &Claim) -> String {
    let mut json = serde_json::to_string_pretty(claim).unwrap_or_default();
    json.push('\n');
    json
}
