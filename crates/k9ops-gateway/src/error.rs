//! Error types for the enforcement gateway

use thiserror::Error;

/// The single externally observable denial outcome.
///
/// Callers only ever see this value. Whether the request was missing a
/// project identifier, named a project that does not exist, came from a
/// non-member, or failed permission resolution is recorded internally
/// through the log and never leaks to the caller.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("forbidden")]
pub struct Forbidden;

/// Result type for guarded operations
pub type Result<T> = std::result::Result<T, Forbidden>;
