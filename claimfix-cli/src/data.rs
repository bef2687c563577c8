//! Fixture-file data directory backing the CLI.
//!
//! Layout: `claims.json`, `patients.json`, `coverages.json`,
//! `eligibility.json`, `exports.json` (all optional arrays), and an
//! optional `tables.json` for the rule tables. Claims and export records
//! are written back after mutating commands.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use claimfix_core::{ClaimStore, ExportStore, InMemoryStore};
use claimfix_tables::{RuleTables, load_tables};
use fs_err as fs;
use serde::de::DeserializeOwned;
use tracing::debug;

pub struct DataDir {
    root: Utf8PathBuf,
}

impl DataDir {
    pub fn new(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    pub fn exports_dir(&self) -> Utf8PathBuf {
        self.root.join("exports").join("edi")
    }

    /// Rule tables: explicit flag path, else `tables.json` in the data
    /// directory, else the built-in demo tables.
    pub fn rule_tables(&self, override_path: Option<&Utf8Path>) -> anyhow::Result<RuleTables> {
        if let Some(path) = override_path {
            return load_tables(path).with_context(|| format!("load rule tables from {path}"));
        }

        let default = self.root.join("tables.json");
        if default.exists() {
            return load_tables(&default)
                .with_context(|| format!("load rule tables from {default}"));
        }

        debug!("no tables.json found; using built-in demo tables");
        Ok(RuleTables::builtin())
    }

    /// Load every fixture file into a fresh in-memory store.
    pub fn load_store(&self) -> anyhow::Result<InMemoryStore> {
        let store = InMemoryStore::new();

        for claim in self.read_array("claims.json")? {
            store.add_claim(claim);
        }
        for patient in self.read_array("patients.json")? {
            store.add_patient(patient);
        }
        for coverage in self.read_array("coverages.json")? {
            store.add_coverage(coverage);
        }
        for snapshot in self.read_array("eligibility.json")? {
            store.add_snapshot(snapshot);
        }
        for record in self.read_array("exports.json")? {
            store.insert_export(record)?;
        }
        Ok(store)
    }

    /// Persist the claim table back to `claims.json`.
    pub fn save_claims(&self, store: &InMemoryStore) -> anyhow::Result<()> {
        let claims = store.list_claims()?;
        self.write_array("claims.json", &claims)
    }

    /// Persist the export records back to `exports.json`.
    pub fn save_exports(&self, store: &InMemoryStore) -> anyhow::Result<()> {
        let records = store.list_exports()?;
        self.write_array("exports.json", &records)
    }

    fn read_array<T: DeserializeOwned>(&self, name: &str) -> anyhow::Result<Vec<T>> {
        let path = self.root.join(name);
        if !path.exists() {
            return Ok(vec![]);
        }
        let contents = fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
        serde_json::from_str(&contents).with_context(|| format!("parse {path}"))
    }

    fn write_array<T: serde::Serialize>(&self, name: &str, items: &[T]) -> anyhow::Result<()> {
        let path = self.root.join(name);
        let json = serde_json::to_string_pretty(items).context("serialize")?;
        fs::write(&path, json).with_context(|| format!("write {path}"))
    }
}
