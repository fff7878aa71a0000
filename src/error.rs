//! Error types for declog

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the declog library
#[derive(Error, Debug)]
pub enum Error {
    /// A decision draft failed validation at the store boundary
    #[error("validation error: {0}")]
    Validation(String),

    /// Lookup by an id the store has never issued
    #[error("decision not found: {0}")]
    DecisionNotFound(String),

    /// No journal has been initialized at this path.
    ///
    /// Distinct from an initialized journal with zero decisions, which is
    /// not an error.
    #[error("no decision journal found at {0} (journal directory missing)")]
    ProjectNotFound(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding/decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Database error (sqlite backend)
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend error (corrupt journal data, unknown backend, ...)
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type alias for declog
pub type Result<T> = std::result::Result<T, Error>;
