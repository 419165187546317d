//! Semantic diff engine.
//!
//! Compares a reference value against a candidate value and reports only
//! the differences the candidate actually asks for. Unset candidate fields
//! (empty strings, zero numbers, absent optionals, empty collections, the
//! default timestamp) never produce a difference, and map keys that exist
//! only in the reference are ignored.
//!
//! ## Entry point
//!
//! ```
//! use vzdiff_core::diffable_record;
//! use vzdiff_core::diff::diff;
//!
//! struct Service {
//!     name: String,
//!     ports: Vec<u16>,
//! }
//!
//! diffable_record!(Service { name, ports });
//!
//! let live = Service { name: "web".into(), ports: vec![80, 443] };
//! let desired = Service { name: String::new(), ports: vec![80] };
//! let report = diff(&live, &desired);
//! assert!(report.contains("- ") && report.contains("443"));
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: record fields render in declaration order and map
//!   entries in rendered-key order, so identical inputs give byte-identical
//!   reports.
//! - **Purity**: comparison never mutates either value and never fails.
//! - **Asymmetry**: suppression is keyed on the candidate only; reference-only
//!   map keys are ignored while reference-only sequence elements are removals.

pub mod describe;
pub mod engine;
pub mod model;
pub mod render;

pub use describe::{describe, DiffKey, Diffable, Describer};
pub use engine::{compare_nodes, diff, Comparison};
pub use model::{Container, DiffNode, DiffStats, Emptiness, Label, Node};
pub use render::render_report;
