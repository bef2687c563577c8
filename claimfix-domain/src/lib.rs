//! Domain logic: turn a claim and the configured rule tables into findings
//! and a deterministic set of corrective changes.
//!
//! This crate owns *what* is wrong with a claim and how to fix it. It does
//! not own persistence or locking; that's the `claimfix-core` crate.

mod fixers;
mod pipeline;
mod rules;

pub use fixers::{Fixer, builtin_fixers};
pub use pipeline::{AutofixEngine, FixContext, FixOutcome, MAX_FIX_CYCLES, apply_change};
pub use rules::{Rule, RuleSet, builtin_rules};
