//! Custom error types for centinela

use thiserror::Error;

/// Main error type for centinela operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No PDF documents found in {0}")]
    NoDocuments(String),

    #[error("Failed to load {file}: {reason}")]
    PdfLoad { file: String, reason: String },

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Index error: {0}")]
    Store(String),

    #[error("Operation timed out after {0}s")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Not initialized: run 'centinela init' first")]
    NotInitialized,

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

/// Result type alias for centinela
pub type Result<T> = std::result::Result<T, Error>;
