use camino::Utf8Path;
use fs_err as fs;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::debug;

/// One mutually-exclusive procedure pair from the NCCI edit table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NcciEdit {
    pub primary: String,
    pub secondary: String,

    /// Edit classification shown in messages, e.g. "PAIR".
    #[serde(default = "default_edit_type")]
    pub edit_type: String,
}

fn default_edit_type() -> String {
    "PAIR".to_string()
}

/// Immutable lookup tables consumed by rules and fixers.
///
/// Loaded once at startup; rule evaluation only ever borrows these, so any
/// number of worker threads may share one instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTables {
    #[serde(default)]
    pub ncci_pairs: Vec<NcciEdit>,

    /// Procedure codes that are office E/M visits.
    #[serde(default)]
    pub office_em: BTreeSet<String>,

    /// Maximum units per encounter, keyed by procedure code.
    #[serde(default)]
    pub mue_limits: BTreeMap<String, u32>,

    /// The place-of-service code office E/M lines must carry.
    #[serde(default = "default_office_pos")]
    pub office_pos: String,

    /// Allowed absolute difference between a claim total and its line sum.
    #[serde(default = "default_charge_tolerance")]
    pub charge_tolerance: Decimal,
}

fn default_office_pos() -> String {
    "11".to_string()
}

fn default_charge_tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

impl RuleTables {
    /// Demo tables matching the seed data the starter system ships with:
    /// office E/M codes 99202..=99215, a handful of MUE limits, and the
    /// 99214/99215 NCCI pair.
    pub fn builtin() -> Self {
        let office_em = (99202..=99215).map(|n| n.to_string()).collect();

        let mut mue_limits = BTreeMap::new();
        mue_limits.insert("99214".to_string(), 1);
        mue_limits.insert("99215".to_string(), 1);
        mue_limits.insert("36415".to_string(), 3);

        Self {
            ncci_pairs: vec![NcciEdit {
                primary: "99214".to_string(),
                secondary: "99215".to_string(),
                edit_type: "PAIR".to_string(),
            }],
            office_em,
            mue_limits,
            office_pos: default_office_pos(),
            charge_tolerance: default_charge_tolerance(),
        }
    }

    pub fn is_office_em(&self, cpt: &str) -> bool {
        self.office_em.contains(cpt)
    }

    pub fn mue_limit(&self, cpt: &str) -> Option<u32> {
        self.mue_limits.get(cpt).copied()
    }

    /// NCCI edits whose primary and secondary codes are both present in
    /// `codes`, in table order.
    pub fn edits_present(&self, codes: &[&str]) -> Vec<&NcciEdit> {
        self.ncci_pairs
            .iter()
            .filter(|e| {
                codes.contains(&e.primary.as_str()) && codes.contains(&e.secondary.as_str())
            })
            .collect()
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        for edit in &self.ncci_pairs {
            if edit.primary.trim().is_empty() || edit.secondary.trim().is_empty() {
                return Err(ConfigurationError::Invalid {
                    message: "ncci edit with empty procedure code".to_string(),
                });
            }
            if edit.primary == edit.secondary {
                return Err(ConfigurationError::Invalid {
                    message: format!("ncci edit pairs {} with itself", edit.primary),
                });
            }
        }

        for (code, limit) in &self.mue_limits {
            if code.trim().is_empty() {
                return Err(ConfigurationError::Invalid {
                    message: "mue limit with empty procedure code".to_string(),
                });
            }
            if *limit == 0 {
                return Err(ConfigurationError::Invalid {
                    message: format!("mue limit for {code} is zero"),
                });
            }
        }

        if self.office_pos.trim().is_empty() {
            return Err(ConfigurationError::Invalid {
                message: "office place-of-service code is empty".to_string(),
            });
        }

        if self.charge_tolerance < Decimal::ZERO {
            return Err(ConfigurationError::Invalid {
                message: "charge tolerance is negative".to_string(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Error, Clone)]
pub enum ConfigurationError {
    #[error("io error: {message}")]
    Io { message: String },

    #[error("json parse error: {message}")]
    Json { message: String },

    #[error("invalid rule tables: {message}")]
    Invalid { message: String },
}

/// Load and validate rule tables from a JSON file.
pub fn load_tables(path: &Utf8Path) -> Result<RuleTables, ConfigurationError> {
    debug!(path = %path, "loading rule tables");

    let contents = fs::read_to_string(path).map_err(|e| ConfigurationError::Io {
        message: e.to_string(),
    })?;

    let tables: RuleTables =
        serde_json::from_str(&contents).map_err(|e| ConfigurationError::Json {
            message: e.to_string(),
        })?;

    tables.validate()?;
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    #[test]
    fn builtin_tables_pass_validation() {
        let tables = RuleTables::builtin();
        tables.validate().expect("builtin tables valid");
        assert!(tables.is_office_em("99214"));
        assert!(!tables.is_office_em("36415"));
        assert_eq!(tables.mue_limit("36415"), Some(3));
        assert_eq!(tables.mue_limit("00000"), None);
        assert_eq!(tables.charge_tolerance, dec!(0.01));
    }

    #[test]
    fn edits_present_requires_both_codes() {
        let tables = RuleTables::builtin();
        assert!(tables.edits_present(&["99214"]).is_empty());
        let hits = tables.edits_present(&["99215", "99214", "36415"]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].primary, "99214");
    }

    #[test]
    fn load_tables_reads_json_with_defaults() {
        let temp = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(temp.path().join("tables.json")).expect("utf8");
        fs::write(
            &path,
            r#"{
                "ncci_pairs": [{"primary": "99214", "secondary": "99215"}],
                "office_em": ["99213", "99214"],
                "mue_limits": {"36415": 3}
            }"#,
        )
        .expect("write tables");

        let tables = load_tables(&path).expect("load tables");
        assert_eq!(tables.office_pos, "11");
        assert_eq!(tables.ncci_pairs[0].edit_type, "PAIR");
        assert_eq!(tables.charge_tolerance, dec!(0.01));
    }

    #[test]
    fn load_tables_rejects_missing_file() {
        let err = load_tables(Utf8Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, ConfigurationError::Io { .. }));
    }

    #[test]
    fn load_tables_rejects_bad_json() {
        let temp = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(temp.path().join("tables.json")).expect("utf8");
        fs::write(&path, "not json").expect("write");
        let err = load_tables(&path).unwrap_err();
        assert!(matches!(err, ConfigurationError::Json { .. }));
    }

    #[test]
    fn validate_rejects_self_pair_and_zero_limit() {
        let mut tables = RuleTables::builtin();
        tables.ncci_pairs.push(NcciEdit {
            primary: "99214".to_string(),
            secondary: "99214".to_string(),
            edit_type: "PAIR".to_string(),
        });
        assert!(matches!(
            tables.validate(),
            Err(ConfigurationError::Invalid { .. })
        ));

        let mut tables = RuleTables::builtin();
        tables.mue_limits.insert("99213".to_string(), 0);
        assert!(matches!(
            tables.validate(),
            Err(ConfigurationError::Invalid { .. })
        ));
    }
}
