//! EDI 837P export generation and lifecycle tracking.
//!
//! Responsibilities:
//! - Build a validator-friendly 837P segment list for a claim.
//! - Write the export file and record it with a sha256 computed over the
//!   exact bytes written.
//! - Drive the QUEUED -> SENT/FAILED state machine; terminal states never
//!   transition again.

mod edi;
mod tracker;

pub use edi::{build_837p, render_segments};
pub use tracker::{ExportStateError, export_file_name, mark_failed, mark_sent, write_export};
