//! Default in-memory port implementation, used by the CLI's fixture loader
//! and by tests.

use crate::ports::{ClaimStore, CoverageSource, EligibilitySource, ExportStore, PatientSource};
use claimfix_types::claim::Claim;
use claimfix_types::coverage::{Coverage, Patient};
use claimfix_types::eligibility::EligibilitySnapshot;
use claimfix_types::export::ExportRecord;
use std::collections::BTreeMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Mutex-guarded maps behind every port trait.
///
/// Interior mutability keeps the port methods `&self`, matching how a real
/// database-backed store would look.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    claims: Mutex<BTreeMap<i64, Claim>>,
    patients: Mutex<BTreeMap<i64, Patient>>,
    coverages: Mutex<Vec<Coverage>>,
    snapshots: Mutex<Vec<EligibilitySnapshot>>,
    exports: Mutex<BTreeMap<Uuid, ExportRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_claim(&self, claim: Claim) {
        self.claims.lock().expect("lock claims").insert(claim.id, claim);
    }

    pub fn add_patient(&self, patient: Patient) {
        self.patients
            .lock()
            .expect("lock patients")
            .insert(patient.id, patient);
    }

    pub fn add_coverage(&self, coverage: Coverage) {
        self.coverages.lock().expect("lock coverages").push(coverage);
    }

    pub fn add_snapshot(&self, snapshot: EligibilitySnapshot) {
        self.snapshots.lock().expect("lock snapshots").push(snapshot);
    }
}

impl ClaimStore for InMemoryStore {
    fn get_claim(&self, id: i64) -> anyhow::Result<Option<Claim>> {
        Ok(self.claims.lock().expect("lock claims").get(&id).cloned())
    }

    fn put_claim(&self, claim: Claim) -> anyhow::Result<()> {
        self.claims.lock().expect("lock claims").insert(claim.id, claim);
        Ok(())
    }

    fn list_claims(&self) -> anyhow::Result<Vec<Claim>> {
        Ok(self.claims.lock().expect("lock claims").values().cloned().collect())
    }
}

impl PatientSource for InMemoryStore {
    fn patient(&self, id: i64) -> anyhow::Result<Option<Patient>> {
        Ok(self.patients.lock().expect("lock patients").get(&id).cloned())
    }
}

impl CoverageSource for InMemoryStore {
    fn latest_for_patient(&self, patient_id: i64) -> anyhow::Result<Option<Coverage>> {
        let coverages = self.coverages.lock().expect("lock coverages");
        Ok(coverages
            .iter()
            .filter(|c| c.patient_id == patient_id)
            .max_by_key(|c| (c.effective_date, c.id))
            .cloned())
    }
}

impl EligibilitySource for InMemoryStore {
    fn latest_snapshot(&self, patient_id: i64) -> anyhow::Result<Option<EligibilitySnapshot>> {
        let coverage_ids: Vec<i64> = {
            let coverages = self.coverages.lock().expect("lock coverages");
            coverages
                .iter()
                .filter(|c| c.patient_id == patient_id)
                .map(|c| c.id)
                .collect()
        };

        let snapshots = self.snapshots.lock().expect("lock snapshots");
        Ok(snapshots
            .iter()
            .filter(|s| coverage_ids.contains(&s.coverage_id))
            .max_by_key(|s| s.checked_at)
            .cloned())
    }
}

impl ExportStore for InMemoryStore {
    fn insert_export(&self, record: ExportRecord) -> anyhow::Result<()> {
        self.exports
            .lock()
            .expect("lock exports")
            .insert(record.id, record);
        Ok(())
    }

    fn get_export(&self, id: Uuid) -> anyhow::Result<Option<ExportRecord>> {
        Ok(self.exports.lock().expect("lock exports").get(&id).cloned())
    }

    fn put_export(&self, record: ExportRecord) -> anyhow::Result<()> {
        self.exports
            .lock()
            .expect("lock exports")
            .insert(record.id, record);
        Ok(())
    }

    fn exports_for_claim(&self, claim_id: i64) -> anyhow::Result<Vec<ExportRecord>> {
        let exports = self.exports.lock().expect("lock exports");
        let mut records: Vec<ExportRecord> = exports
            .values()
            .filter(|r| r.claim_id == claim_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }

    fn list_exports(&self) -> anyhow::Result<Vec<ExportRecord>> {
        let exports = self.exports.lock().expect("lock exports");
        let mut records: Vec<ExportRecord> = exports.values().cloned().collect();
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn coverage(id: i64, patient_id: i64, effective: Option<(i32, u32, u32)>) -> Coverage {
        Coverage {
            id,
            patient_id,
            payer_name: format!("Payer {id}"),
            member_id: "M".to_string(),
            group_number: String::new(),
            effective_date: effective.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            relation_to_subscriber: "self".to_string(),
            plan_product: "PPO".to_string(),
        }
    }

    #[test]
    fn latest_coverage_prefers_effective_date_then_id() {
        let store = InMemoryStore::new();
        store.add_coverage(coverage(1, 1, Some((2024, 1, 1))));
        store.add_coverage(coverage(2, 1, Some((2025, 1, 1))));
        store.add_coverage(coverage(3, 1, None));
        store.add_coverage(coverage(4, 2, Some((2026, 1, 1))));

        let latest = store.latest_for_patient(1).unwrap().unwrap();
        assert_eq!(latest.id, 2);
    }

    #[test]
    fn missing_patient_has_no_coverage() {
        let store = InMemoryStore::new();
        assert!(store.latest_for_patient(9).unwrap().is_none());
        assert!(store.latest_snapshot(9).unwrap().is_none());
    }
}
