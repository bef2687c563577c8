//! Shared DTOs (schemas-as-code) for the claimfix workspace.
//!
//! # Design constraints
//! - These types are intended to be serialized to disk and over APIs.
//! - Be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod change;
pub mod claim;
pub mod coverage;
pub mod eligibility;
pub mod export;
pub mod finding;
