//! Error types shared by the domain and application layers.

use thiserror::Error;

/// Failures reported by a [`crate::domain::repositories::LinkStore`] or
/// [`crate::domain::repositories::ClickStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("unique constraint violation on {constraint}")]
    UniqueViolation { constraint: String },

    /// The call did not finish before its deadline.
    #[error("store operation timed out")]
    Timeout,

    /// Any other backend failure (connection loss, foreign key, decode error).
    #[error("store error: {0}")]
    Database(String),
}

/// Errors surfaced by link creation, resolution and analytics lookups.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The requested custom code is already used by another link.
    #[error("short code '{0}' is already taken")]
    CodeTaken(String),

    /// No link exists for the given code.
    #[error("short link '{0}' not found")]
    NotFound(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid custom code: {0}")]
    InvalidCustomCode(String),

    #[error("invalid time range: {0}")]
    InvalidTimeRange(String),

    /// Every generation attempt collided with an existing code.
    #[error("failed to generate a unique short code")]
    CodeSpaceExhausted,

    #[error(transparent)]
    Store(#[from] StoreError),
}
