//! Port traits abstracting all persistence away from the pipeline.
//!
//! Every trait is `Send + Sync`; the pipeline itself holds no mutable
//! state, so one store may serve any number of worker threads.

use claimfix_types::claim::Claim;
use claimfix_types::coverage::{Coverage, Patient};
use claimfix_types::eligibility::EligibilitySnapshot;
use claimfix_types::export::ExportRecord;
use uuid::Uuid;

/// Claim persistence.
pub trait ClaimStore: Send + Sync {
    fn get_claim(&self, id: i64) -> anyhow::Result<Option<Claim>>;

    /// Replace the stored claim (including its line/diagnosis lists).
    fn put_claim(&self, claim: Claim) -> anyhow::Result<()>;

    /// All claims, ordered by id.
    fn list_claims(&self) -> anyhow::Result<Vec<Claim>>;
}

/// Patient record lookup.
pub trait PatientSource: Send + Sync {
    fn patient(&self, id: i64) -> anyhow::Result<Option<Patient>>;
}

/// Coverage lookup, latest by effective date.
pub trait CoverageSource: Send + Sync {
    fn latest_for_patient(&self, patient_id: i64) -> anyhow::Result<Option<Coverage>>;
}

/// Eligibility snapshot lookup, latest by check time.
pub trait EligibilitySource: Send + Sync {
    fn latest_snapshot(&self, patient_id: i64) -> anyhow::Result<Option<EligibilitySnapshot>>;
}

/// Export record persistence. Append-only apart from status updates.
pub trait ExportStore: Send + Sync {
    fn insert_export(&self, record: ExportRecord) -> anyhow::Result<()>;
    fn get_export(&self, id: Uuid) -> anyhow::Result<Option<ExportRecord>>;
    fn put_export(&self, record: ExportRecord) -> anyhow::Result<()>;
    fn exports_for_claim(&self, claim_id: i64) -> anyhow::Result<Vec<ExportRecord>>;

    /// All records, oldest first.
    fn list_exports(&self) -> anyhow::Result<Vec<ExportRecord>>;
}
