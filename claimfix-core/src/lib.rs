//! Core pipelines for claimfix, extracted behind port traits.
//!
//! These entry points are I/O-agnostic: claim, coverage, eligibility, and
//! export persistence all go through the ports in [`ports`], so the same
//! pipeline serves the CLI, tests, and any embedding service.

mod adapters;
mod error;
mod pipeline;
mod ports;

pub use adapters::InMemoryStore;
pub use error::CoreError;
pub use pipeline::{
    ApplyLocks, ApplyPermit, AutofixMode, AutofixOutcome, Deps, DeliveryOutcome,
    EstimateOutcome, OFFICE_VISIT_CATEGORY, WorkqueueRow, download_export,
    primary_service_category, resolve_export, run_apply, run_estimate, run_export, run_preview,
    run_scrub, run_workqueue,
};
pub use ports::{ClaimStore, CoverageSource, EligibilitySource, ExportStore, PatientSource};
