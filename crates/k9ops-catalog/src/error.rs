//! Error types for the permission catalog

use thiserror::Error;

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the permission catalog
#[derive(Error, Debug)]
pub enum Error {
    #[error("Permission catalog is empty after seeding")]
    EmptyCatalog,

    #[error("Invalid permission key: {key}")]
    InvalidKey { key: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
