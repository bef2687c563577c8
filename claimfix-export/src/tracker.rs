//! Export record creation and the QUEUED -> SENT/FAILED state machine.

use crate::edi::{build_837p, render_segments};
use anyhow::Context;
use camino::Utf8Path;
use chrono::{DateTime, Utc};
use claimfix_types::claim::Claim;
use claimfix_types::coverage::{Coverage, Patient};
use claimfix_types::export::{ExportRecord, ExportStatus};
use fs_err as fs;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportStateError {
    #[error("export {id} is terminal ({status}); cannot transition")]
    Terminal { id: Uuid, status: String },
}

/// Timestamp- and id-qualified file name for one export attempt.
///
/// The id suffix keeps two exports of the same claim within one second from
/// colliding; files are never overwritten.
pub fn export_file_name(claim_id: i64, record_id: Uuid, now: DateTime<Utc>) -> String {
    let stamp = now.format("%Y%m%d%H%M%S");
    let id = record_id.simple().to_string();
    format!("claim_{claim_id}_{stamp}_{}.txt", &id[..8])
}

/// Build the 837P body for a claim, write it under `exports_dir`, and
/// return the QUEUED record.
///
/// The checksum is taken over the exact byte buffer handed to the
/// filesystem, before the write, so there is no re-read race.
pub fn write_export(
    exports_dir: &Utf8Path,
    claim: &Claim,
    patient: &Patient,
    coverage: Option<&Coverage>,
    now: DateTime<Utc>,
) -> anyhow::Result<ExportRecord> {
    let record_id = Uuid::new_v4();
    let file_path = exports_dir.join(export_file_name(claim.id, record_id, now));

    let body = render_segments(&build_837p(claim, patient, coverage, now));
    let sha256 = sha256_hex(body.as_bytes());

    fs::create_dir_all(exports_dir).with_context(|| format!("create {exports_dir}"))?;
    fs::write(&file_path, &body).with_context(|| format!("write {file_path}"))?;

    debug!(claim_id = claim.id, path = %file_path, "queued export");

    Ok(ExportRecord {
        id: record_id,
        claim_id: claim.id,
        file_path,
        status: ExportStatus::Queued,
        sha256,
        created_at: now,
    })
}

/// Record a successful delivery acknowledgment.
pub fn mark_sent(record: &mut ExportRecord) -> Result<(), ExportStateError> {
    transition(record, ExportStatus::Sent)
}

/// Record a delivery error.
pub fn mark_failed(record: &mut ExportRecord) -> Result<(), ExportStateError> {
    transition(record, ExportStatus::Failed)
}

fn transition(record: &mut ExportRecord, to: ExportStatus) -> Result<(), ExportStateError> {
    if record.status.is_terminal() {
        return Err(ExportStateError::Terminal {
            id: record.id,
            status: format!("{:?}", record.status),
        });
    }
    record.status = to;
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use chrono::NaiveDate;
    use claimfix_types::claim::{ClaimLine, Diagnosis};
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn claim() -> Claim {
        Claim {
            id: 1,
            patient_id: 1,
            payer_name: "Sample Health".to_string(),
            pos: "11".to_string(),
            total_charge: dec!(150.00),
            diagnoses: vec![Diagnosis {
                order: 1,
                code: "E11.9".to_string(),
            }],
            lines: vec![ClaimLine {
                id: 10,
                cpt: "99214".to_string(),
                units: 1,
                charge: dec!(150.00),
                dx_pointers: vec![1],
            }],
        }
    }

    fn patient() -> Patient {
        Patient {
            id: 1,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1980, 1, 1),
        }
    }

    fn now() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2025, 8, 24)
            .unwrap()
            .and_hms_opt(10, 15, 1)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn file_name_is_timestamp_and_id_qualified() {
        let id = Uuid::new_v4();
        let name = export_file_name(1, id, now());
        assert!(name.starts_with("claim_1_20250824101501_"));
        assert!(name.ends_with(".txt"));
    }

    #[test]
    fn write_export_records_checksum_of_written_bytes() {
        let temp = TempDir::new().expect("temp dir");
        let dir = Utf8PathBuf::from_path_buf(temp.path().join("edi")).expect("utf8");

        let record = write_export(&dir, &claim(), &patient(), None, now()).expect("export");
        assert_eq!(record.status, ExportStatus::Queued);
        assert_eq!(record.claim_id, 1);

        let on_disk = fs::read(record.file_path.as_std_path()).expect("read back");
        assert_eq!(record.sha256, sha256_hex(&on_disk));
        assert_eq!(record.sha256.len(), 64);
    }

    #[test]
    fn re_export_gets_fresh_id_path_and_record() {
        let temp = TempDir::new().expect("temp dir");
        let dir = Utf8PathBuf::from_path_buf(temp.path().join("edi")).expect("utf8");

        let a = write_export(&dir, &claim(), &patient(), None, now()).expect("export a");
        let b = write_export(&dir, &claim(), &patient(), None, now()).expect("export b");
        assert_ne!(a.id, b.id);
        assert_ne!(a.file_path, b.file_path);
        // Same bytes, same content hash; distinct records all the same.
        assert_eq!(a.sha256, b.sha256);
    }

    #[test]
    fn queued_transitions_once_then_locks() {
        let temp = TempDir::new().expect("temp dir");
        let dir = Utf8PathBuf::from_path_buf(temp.path().join("edi")).expect("utf8");
        let mut record = write_export(&dir, &claim(), &patient(), None, now()).expect("export");

        mark_sent(&mut record).expect("queued -> sent");
        assert_eq!(record.status, ExportStatus::Sent);

        let err = mark_failed(&mut record).unwrap_err();
        assert!(matches!(err, ExportStateError::Terminal { .. }));
        assert_eq!(record.status, ExportStatus::Sent);
    }

    #[test]
    fn failed_is_terminal_too() {
        let temp = TempDir::new().expect("temp dir");
        let dir = Utf8PathBuf::from_path_buf(temp.path().join("edi")).expect("utf8");
        let mut record = write_export(&dir, &claim(), &patient(), None, now()).expect("export");

        mark_failed(&mut record).expect("queued -> failed");
        let err = mark_sent(&mut record).unwrap_err();
        assert!(matches!(err, ExportStateError::Terminal { .. }));
    }
}
