//! Core types shared across vzdiff facilities
//!
//! This crate holds the canonical schema constants used by both the error
//! facility and the logging facility, so that field keys and event names
//! stay identical wherever they are emitted.

pub mod schema;
