//! Error taxonomy for the core pipelines.
//!
//! Validation findings are not errors; they are a first-class output of the
//! engine. Everything here is scoped to the single claim or request being
//! processed.

use claimfix_estimate::EstimationError;
use claimfix_export::ExportStateError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("claim {0} not found")]
    ClaimNotFound(i64),

    #[error("patient {0} not found")]
    PatientNotFound(i64),

    #[error("no eligibility snapshot on file for patient {0}")]
    SnapshotNotFound(i64),

    #[error("export {0} not found")]
    ExportNotFound(Uuid),

    #[error("export {0} is not SENT; nothing to download")]
    ExportNotSent(Uuid),

    /// Another apply is in flight for this claim id. Retryable.
    #[error("another apply is in flight for claim {0}")]
    ConcurrentApply(i64),

    #[error(transparent)]
    Estimation(#[from] EstimationError),

    #[error(transparent)]
    ExportState(#[from] ExportStateError),

    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimation_errors_pass_through() {
        let err = CoreError::from(EstimationError::InactiveCoverage);
        assert!(err.to_string().contains("inactive"));
    }

    #[test]
    fn concurrent_apply_names_the_claim() {
        let err = CoreError::ConcurrentApply(7);
        assert_eq!(err.to_string(), "another apply is in flight for claim 7");
    }
}
