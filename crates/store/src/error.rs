//! Error types for the storage layer.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Query construction errors (client input).
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Backend execution errors.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors raised while describing a query.
///
/// These always originate from client input and surface as HTTP 400; they
/// are never masked as server faults.
#[derive(Error, Debug)]
pub enum QueryError {
    /// A sort field name that is not in the sortable-column enumeration.
    #[error("unknown sort field: {name}")]
    UnknownSortField { name: String },
}

/// Errors raised by the storage backend itself.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Could not obtain a connection from the pool.
    #[error("connection failed: {message}")]
    ConnectionFailed { message: String },

    /// A SQL statement failed to prepare or execute.
    #[error("sqlite error: {message}")]
    Sqlite { message: String },

    /// A stored row could not be mapped back into a contract.
    #[error("corrupt row: {message}")]
    CorruptRow { message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
