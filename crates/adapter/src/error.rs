//! Error types for the RestCSV adapter.

use thiserror::Error;

/// Main error type for the adapter.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// Configuration errors (missing credential, invalid catalog, bad flags)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Startup errors (logging or transport failed to initialize)
    #[error("Startup error: {0}")]
    Startup(String),

    /// Tool source errors surfaced while building the server
    #[error("HTTP tools error: {0}")]
    HttpTools(#[from] restcsv_http_tools::runtime::HttpToolsError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;
