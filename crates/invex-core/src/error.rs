//! Error types for the invex-core library.

use thiserror::Error;

/// Main error type for the invex library.
#[derive(Error, Debug)]
pub enum InvexError {
    /// Record store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by record store implementations.
///
/// A missing record is not an error; lookups signal absence with
/// `Ok(None)`. These variants cover the store itself failing, and a
/// failed lookup must never be read as "no match".
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store backend cannot be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A lookup or insert was rejected by the backend.
    #[error("query failed: {0}")]
    Query(String),

    /// A record could not be encoded or decoded.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Result type for the invex library.
pub type Result<T> = std::result::Result<T, InvexError>;
