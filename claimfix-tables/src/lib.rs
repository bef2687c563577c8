//! Rule-table configuration for the claimfix rule set.
//!
//! The tables driving NCCI/POS/MUE checks are loaded once at startup,
//! validated, and read-only thereafter. A malformed table file is a
//! [`ConfigurationError`] and fatal at startup, never a per-claim failure.

mod load;

pub use load::{ConfigurationError, NcciEdit, RuleTables, load_tables};
