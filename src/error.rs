//! Error types for background removal client operations

use thiserror::Error;

/// Fallback message shown when the remote service gives no usable detail
pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to process image";

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Error types for intake, submission and export
#[derive(Error, Debug)]
pub enum ClientError {
    /// Declared MIME type does not start with `image/`
    #[error("Invalid file type: {mime_type}")]
    InvalidFileType { mime_type: String },

    /// Upload exceeds the configured size limit
    #[error("File too large: {size} bytes (limit: {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    /// Remote service answered with a structured error detail
    #[error("Remote error: {0}")]
    Remote(String),

    /// Transport failure or non-success response without detail
    #[error("Network error: {0}")]
    Network(String),

    /// Saving the processed image failed
    #[error("Export error: {0}")]
    Export(String),

    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed payloads (data URLs, JSON, image bytes)
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// Create a new remote error from a service-supplied detail
    pub fn remote<S: Into<String>>(detail: S) -> Self {
        Self::Remote(detail.into())
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }

    /// Create a new export error
    pub fn export<S: Into<String>>(msg: S) -> Self {
        Self::Export(msg.into())
    }

    /// Create a new decode error
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create network error with operation context
    pub fn network_error<E: std::fmt::Display>(context: &str, error: E) -> Self {
        Self::Network(format!("{}: {}", context, error))
    }

    /// Create file I/O error with operation context
    pub fn file_io_error<P: AsRef<std::path::Path>>(
        operation: &str,
        path: P,
        error: &std::io::Error,
    ) -> Self {
        let path_display = path.as_ref().display();
        Self::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to {} '{}': {}", operation, path_display, error),
        ))
    }

    /// Create configuration error with valid ranges
    pub fn config_value_error<T: std::fmt::Display>(
        parameter: &str,
        value: T,
        valid_range: &str,
    ) -> Self {
        Self::InvalidConfig(format!(
            "Invalid {}: {} (valid range: {})",
            parameter, value, valid_range
        ))
    }
}

/// User-visible error message held by the workflow state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationError {
    message: String,
}

impl OperationError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The generic message used when nothing more specific is known
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(FALLBACK_ERROR_MESSAGE)
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for OperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<&ClientError> for OperationError {
    fn from(error: &ClientError) -> Self {
        match error {
            ClientError::InvalidFileType { .. } => Self::new("Please select a valid image file"),
            ClientError::FileTooLarge { limit, .. } => {
                Self::new(format!("File size must be less than {}", size_limit_label(*limit)))
            },
            ClientError::Remote(detail) if !detail.trim().is_empty() => Self::new(detail.clone()),
            ClientError::Export(msg) => Self::new(format!("Failed to save image: {}", msg)),
            _ => Self::fallback(),
        }
    }
}

/// Whole MiB limits read as `20MB`; anything else uses the stats formatting
fn size_limit_label(limit: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if limit >= MIB && limit % MIB == 0 {
        format!("{}MB", limit / MIB)
    } else {
        crate::services::StatsFormatter::format_file_size(limit)
    }
}

impl From<ClientError> for OperationError {
    fn from(error: ClientError) -> Self {
        Self::from(&error)
    }
}
