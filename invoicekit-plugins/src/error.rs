//! Error types for plugins, the registry and the repository factory.

use invoicekit_storage::StorageError;
use thiserror::Error;

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("unknown storage backend '{name}' (available: {})", format_available(.available))]
    UnknownBackend {
        name: String,
        available: Vec<String>,
    },

    #[error("storage backend already registered: {0}")]
    DuplicateBackend(String),

    #[error("plugin '{0}' is not initialized; call initialize() first")]
    NotInitialized(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("invalid settings file: {0}")]
    Settings(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        "none".to_string()
    } else {
        available.join(", ")
    }
}
