//! Error types for the permission engine

use thiserror::Error;

/// Result type for permission engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the permission engine
///
/// A denied resolution is a value, not an error: `can` returns false and
/// no variant here represents it.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Mutation denied for actor: {actor}")]
    MutationDenied { actor: String },

    #[error("Unknown capability: {key}")]
    UnknownCapability { key: String },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::StorageError(err.to_string())
    }
}
