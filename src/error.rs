//! Error types for relsql.

use thiserror::Error;

/// The main error type for relsql operations.
#[derive(Debug, Error)]
pub enum RelSqlError {
    /// The tree holds a node or combination the active dialect cannot render.
    #[error("Unsupported query shape: {0}")]
    UnsupportedShape(String),

    /// The tree breaks a structural invariant the upstream translator owns.
    #[error("Malformed expression tree: {0}")]
    MalformedTree(String),

    /// No dialect registered under this identifier.
    #[error("Unknown dialect: '{0}'")]
    UnknownDialect(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RelSqlError {
    /// Create an unsupported-shape error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedShape(message.into())
    }

    /// Create a malformed-tree error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedTree(message.into())
    }
}

/// Result type alias for relsql operations.
pub type RelSqlResult<T> = Result<T, RelSqlError>;
