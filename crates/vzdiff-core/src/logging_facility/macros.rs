//! Canonical logging macros
//!
//! These macros provide a structured, consistent way to log operations.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use vzdiff_core::log_op_start;
/// log_op_start!("load_document");
/// log_op_start!("load_document", document_path = "a.yaml");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::vzdiff_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::vzdiff_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use vzdiff_core::log_op_end;
/// log_op_end!("load_document", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::vzdiff_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::vzdiff_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// The error is converted into the canonical [`VzError`](crate::errors::VzError)
/// so the event always carries a stable kind and code.
///
/// # Example
///
/// ```
/// # use vzdiff_core::{log_op_error, errors::VzDiffError};
/// let err = VzDiffError::UnsupportedFormat { format: "toml".to_string() };
/// log_op_error!("parse_document", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let vz_err: $crate::errors::VzError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::vzdiff_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?vz_err.kind(),
            err.code = vz_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let vz_err: $crate::errors::VzError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::vzdiff_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?vz_err.kind(),
            err.code = vz_err.code(),
            $($field)*
        );
    }};
}
