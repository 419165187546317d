//! vzdiff Core - semantic drift detection for reconciled objects
//!
//! This crate compares a reference value (typically fetched from a live
//! system) against a candidate value (typically constructed by code) and
//! reports only the differences the candidate asks for. It provides:
//! - The semantic diff engine and its text report renderer
//! - JSON/YAML document loading into comparable values
//! - The index lifecycle (ISM) policy model and its update decision
//! - Canonical error and logging facilities shared with the CLI

pub use vzdiff_core_types;

pub mod diff;
pub mod document;
pub mod errors;
pub mod ism;
pub mod logging_facility;

// Re-export commonly used types
pub use diff::{diff, Comparison, Diffable};
pub use document::DocumentFormat;
pub use errors::{Result, VzDiffError, VzError, VzErrorKind};
