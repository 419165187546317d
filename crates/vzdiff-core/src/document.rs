//! Loading JSON and YAML documents as comparable values.
//!
//! Documents are read into [`serde_json::Value`], which implements
//! [`Diffable`](crate::diff::Diffable): objects become maps, arrays become
//! sequences and `null` becomes an absent optional.

use crate::errors::{VzDiffError, VzError};
use crate::{log_op_end, log_op_error, log_op_start};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

/// Serialization format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    /// Pick the format from the file extension
    #[default]
    Auto,
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Resolve `Auto` against a path: `.yaml`/`.yml` is YAML, anything else JSON.
    pub fn resolve(self, path: &Path) -> DocumentFormat {
        match self {
            DocumentFormat::Auto => match path.extension().and_then(|e| e.to_str()) {
                Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                    DocumentFormat::Yaml
                }
                _ => DocumentFormat::Json,
            },
            explicit => explicit,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Auto => "auto",
            DocumentFormat::Json => "json",
            DocumentFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentFormat {
    type Err = VzDiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(DocumentFormat::Auto),
            "json" => Ok(DocumentFormat::Json),
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            other => Err(VzDiffError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

/// Parse document bytes.
///
/// `Auto` is treated as JSON here since there is no path to inspect.
///
/// # Errors
///
/// - `InvalidDocument` when the bytes are not UTF-8 or do not parse
pub fn parse_document(bytes: &[u8], format: DocumentFormat) -> Result<Value, VzError> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        VzError::from(VzDiffError::DocumentNotUtf8 {
            message: e.to_string(),
        })
    })?;

    let parsed = match format {
        DocumentFormat::Yaml => serde_yaml::from_str::<Value>(text).map_err(|e| e.to_string()),
        DocumentFormat::Json | DocumentFormat::Auto => {
            serde_json::from_str::<Value>(text).map_err(|e| e.to_string())
        }
    };

    parsed.map_err(|message| {
        VzError::from(VzDiffError::DocumentParse {
            format: format.resolve(Path::new("")).to_string(),
            message,
        })
    })
}

/// Read and parse the document at `path`.
///
/// # Errors
///
/// - `Io` when the file cannot be read
/// - `InvalidDocument` when its contents do not parse in the resolved format
pub fn load_document(path: &Path, format: DocumentFormat) -> Result<Value, VzError> {
    let start = Instant::now();
    let format = format.resolve(path);
    let path_text = path.display().to_string();
    log_op_start!(
        "load_document",
        document_path = %path_text,
        document_format = format.as_str()
    );

    let result = std::fs::read(path)
        .map_err(|e| {
            VzError::from(VzDiffError::DocumentRead {
                path: path_text.clone(),
                message: e.to_string(),
            })
        })
        .and_then(|bytes| parse_document(&bytes, format).map_err(|e| e.with_path(path_text.clone())));

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            log_op_end!("load_document", duration_ms = duration_ms);
        }
        Err(e) => {
            log_op_error!("load_document", e.clone(), duration_ms = duration_ms);
        }
    }
    result
}
