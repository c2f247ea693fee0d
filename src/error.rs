//! Error types for mailgate.

use thiserror::Error;

/// Common error type for mailgate.
#[derive(Error, Debug)]
pub enum MailGateError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Credential verification failed.
    ///
    /// Carries no detail on purpose: unknown email, wrong secret and lookup
    /// faults all collapse into this one variant.
    #[error("invalid email or password")]
    Unauthorized,

    /// The resource exists but belongs to another account.
    #[error("access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Storage or query service failure surfaced to the caller.
    #[error("upstream failure: {0}")]
    Upstream(String),

    /// Mailbox synchronization failed.
    #[error("sync error: {0}")]
    Sync(String),

    /// Secret hashing error.
    #[error("secret hashing error: {0}")]
    Hash(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for MailGateError {
    fn from(e: sqlx::Error) -> Self {
        MailGateError::Database(e.to_string())
    }
}

/// Result type alias for mailgate operations.
pub type Result<T> = std::result::Result<T, MailGateError>;
