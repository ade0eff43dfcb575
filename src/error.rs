//! Error types for the account history API.
//!
//! Every per-call failure is surfaced directly to the caller; nothing in this
//! crate retries or returns partial results.

use thiserror::Error;

/// Result type alias for account history operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the account history API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ═══════════════════════════════════════════════════════════════════
    // Request Errors
    // ═══════════════════════════════════════════════════════════════════

    /// A request argument violated a precondition
    #[error("Invalid argument {name}: {reason}")]
    InvalidArgument {
        /// Argument name
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    /// The requested object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The active backend or node configuration cannot serve this request
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    // ═══════════════════════════════════════════════════════════════════
    // Configuration Errors
    // ═══════════════════════════════════════════════════════════════════

    /// The service cannot be constructed with the active subsystems
    #[error("Fatal configuration error: {0}")]
    FatalConfiguration(String),

    // ═══════════════════════════════════════════════════════════════════
    // Storage Errors
    // ═══════════════════════════════════════════════════════════════════

    /// An index entry references data that is missing from block storage
    #[error("Inconsistent history: {0}")]
    InconsistentHistory(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization failed
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ═══════════════════════════════════════════════════════════════════
    // Internal Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Internal error (should not happen in production)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Lock acquisition failed
    #[error("Failed to acquire lock")]
    Lock,
}

/// Coarse classification callers can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Precondition violation, detected before any lookup
    InvalidArgument,
    /// Unknown object
    NotFound,
    /// Capability not offered by this backend or node
    UnsupportedOperation,
    /// No history backend is active
    FatalConfiguration,
    /// Storage, encoding or locking failure
    Internal,
}

impl Error {
    /// Shorthand for an [`Error::InvalidArgument`]
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Returns the taxonomy bucket of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Unsupported(_) => ErrorKind::UnsupportedOperation,
            Error::FatalConfiguration(_) => ErrorKind::FatalConfiguration,
            Error::InconsistentHistory(_)
            | Error::Storage(_)
            | Error::Serialization(_)
            | Error::Deserialization(_)
            | Error::Internal(_)
            | Error::Lock => ErrorKind::Internal,
        }
    }

    /// Returns true if the caller can fix the request and try again
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidArgument | ErrorKind::NotFound | ErrorKind::UnsupportedOperation
        )
    }

    /// Returns the error code for external systems
    pub fn code(&self) -> u32 {
        match self {
            // Request errors: 1xxx
            Error::InvalidArgument { .. } => 1001,
            Error::NotFound(_) => 1002,
            Error::Unsupported(_) => 1003,

            // Configuration errors: 2xxx
            Error::FatalConfiguration(_) => 2001,

            // Storage errors: 3xxx
            Error::InconsistentHistory(_) => 3001,
            Error::Storage(_) => 3002,
            Error::Serialization(_) => 3003,
            Error::Deserialization(_) => 3004,

            // Internal errors: 9xxx
            Error::Internal(_) => 9001,
            Error::Lock => 9002,
        }
    }
}
