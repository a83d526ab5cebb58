//! Error types for the storage layer.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Update targeted an id that does not exist.
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    /// Format token that no codec understands.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A codec that was not compiled in (or was disabled) was needed.
    #[error("{codec} support is not available: {hint}")]
    MissingOptionalCodec { codec: &'static str, hint: String },

    /// A document exists but its layout is not what its format requires.
    #[error("invalid document {}: {reason}", path.display())]
    InvalidDocument { path: PathBuf, reason: String },

    /// XML read/write error.
    #[error("XML error: {0}")]
    Xml(String),

    /// YAML read/write error.
    #[error("YAML error: {0}")]
    Yaml(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Database error from SQLite.
    #[cfg(feature = "sqlite")]
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Every id up to `i64::MAX` has been handed out.
    #[error("id sequence exhausted for {0}")]
    SequenceExhausted(String),

    /// A previous panic left shared state poisoned.
    #[error("lock poisoned: {0}")]
    LockPoisoned(&'static str),
}

impl StorageError {
    /// The error raised whenever a YAML document is touched without a YAML codec.
    pub fn missing_yaml(context: impl Into<String>) -> Self {
        Self::MissingOptionalCodec {
            codec: "YAML",
            hint: format!(
                "{}; enable the `yaml` feature of invoicekit-storage \
                 (features = [\"yaml\"]) to read and write YAML documents",
                context.into()
            ),
        }
    }
}

#[cfg(feature = "yaml")]
impl From<serde_yaml::Error> for StorageError {
    fn from(err: serde_yaml::Error) -> Self {
        StorageError::Yaml(err.to_string())
    }
}
