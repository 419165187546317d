use thiserror::Error;

/// Result type alias using VzDiffError
pub type Result<T> = std::result::Result<T, VzDiffError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// The comparison engine itself is total and never produces errors. These
/// kinds cover the layers around it: loading documents to compare, parsing
/// and serialising policy documents, and the command-line surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VzErrorKind {
    // Input
    InvalidInput,
    /// Document bytes are not valid UTF-8, JSON or YAML
    InvalidDocument,
    /// The requested document format cannot be determined or is unknown
    UnsupportedFormat,

    // Policy documents
    /// An ISM policy document is structurally invalid
    InvalidPolicy,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl VzErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            VzErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            VzErrorKind::InvalidDocument => "ERR_INVALID_DOCUMENT",
            VzErrorKind::UnsupportedFormat => "ERR_UNSUPPORTED_FORMAT",
            VzErrorKind::InvalidPolicy => "ERR_INVALID_POLICY",
            VzErrorKind::Io => "ERR_IO",
            VzErrorKind::Serialization => "ERR_SERIALIZATION",
            VzErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a stable kind for programmatic handling plus optional context
/// (operation, document path) for diagnostics.
#[derive(Debug, Clone)]
pub struct VzError {
    kind: VzErrorKind,
    op: Option<String>,
    path: Option<String>,
    message: String,
    source: Option<Box<VzError>>,
}

impl VzError {
    /// Create a new error with the specified kind
    pub fn new(kind: VzErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add document path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: VzError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> VzErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the document path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&VzError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for VzError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for VzError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for vzdiff operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VzDiffError {
    /// A document file could not be read
    #[error("Failed to read document {path}: {message}")]
    DocumentRead { path: String, message: String },

    /// Document bytes are not valid UTF-8
    #[error("Document is not valid UTF-8: {message}")]
    DocumentNotUtf8 { message: String },

    /// Document could not be parsed in the requested format
    #[error("Failed to parse {format} document: {message}")]
    DocumentParse { format: String, message: String },

    /// Document format name is not recognised
    #[error("Unsupported document format: {format}")]
    UnsupportedFormat { format: String },

    /// Policy document is missing a required element
    #[error("Invalid ISM policy: {reason}")]
    InvalidPolicy { reason: String },

    /// Serialization error (JSON/YAML encoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Conversion from VzDiffError to VzError
///
/// Domain errors carry their details in their own fields; the canonical
/// error keeps the classification plus the rendered message.
impl From<VzDiffError> for VzError {
    fn from(err: VzDiffError) -> Self {
        let message = err.to_string();
        match err {
            VzDiffError::DocumentRead { path, .. } => VzError::new(VzErrorKind::Io)
                .with_op("load_document")
                .with_path(path)
                .with_message(message),

            VzDiffError::DocumentNotUtf8 { .. } | VzDiffError::DocumentParse { .. } => {
                VzError::new(VzErrorKind::InvalidDocument)
                    .with_op("parse_document")
                    .with_message(message)
            }

            VzDiffError::UnsupportedFormat { .. } => {
                VzError::new(VzErrorKind::UnsupportedFormat).with_message(message)
            }

            VzDiffError::InvalidPolicy { .. } => {
                VzError::new(VzErrorKind::InvalidPolicy).with_message(message)
            }

            VzDiffError::Serialization { .. } => {
                VzError::new(VzErrorKind::Serialization).with_message(message)
            }

            VzDiffError::Internal { .. } => {
                VzError::new(VzErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to VzDiffError
impl From<serde_json::Error> for VzDiffError {
    fn from(err: serde_json::Error) -> Self {
        VzDiffError::Serialization {
            message: err.to_string(),
        }
    }
}
