//! Client error types

use thiserror::Error;

/// Error type for data store operations
///
/// `RowNotFound` is a first-class variant rather than a string match on
/// the store's error format: the session bootstrap's first-login
/// detection depends on telling "no matching row" apart from every
/// other failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Single-row query matched no row (expected, drives provisioning)
    #[error("row not found")]
    RowNotFound,

    /// Unique constraint violation; carries the store's message verbatim
    #[error("{0}")]
    Conflict(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Row-level policy denied the operation
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Request rejected by the store
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for session provider operations
#[derive(Debug, Error)]
pub enum AuthError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Wrong email/password pair
    #[error("invalid login credentials")]
    InvalidCredentials,

    /// Signup rejected (weak password, email already registered, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;
