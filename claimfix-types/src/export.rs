use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of an export file.
///
/// Transitions move forward only: QUEUED may become SENT or FAILED, both of
/// which are terminal. A cancelled export simply never leaves QUEUED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportStatus {
    Queued,
    Sent,
    Failed,
}

impl ExportStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ExportStatus::Sent | ExportStatus::Failed)
    }
}

/// One export attempt for a claim.
///
/// The checksum is computed once, over the exact bytes written at creation,
/// and never recomputed; a re-export creates a new record with a new path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub id: Uuid,
    pub claim_id: i64,
    pub file_path: Utf8PathBuf,
    pub status: ExportStatus,

    /// Hex sha256 of the file body.
    pub sha256: String,

    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(!ExportStatus::Queued.is_terminal());
        assert!(ExportStatus::Sent.is_terminal());
        assert!(ExportStatus::Failed.is_terminal());
    }

    #[test]
    fn status_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&ExportStatus::Queued).unwrap(),
            "\"QUEUED\""
        );
        assert_eq!(
            serde_json::to_string(&ExportStatus::Sent).unwrap(),
            "\"SENT\""
        );
    }
}
