//! Error types for shardstore

use thiserror::Error;

/// Result type alias for shardstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in shardstore operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Config error: {0}")]
    Config(String),
}
