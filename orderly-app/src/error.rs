//! Application error types

use orderly_client::{AuthError, StoreError};
use thiserror::Error;

/// Unified error type for the application core
#[derive(Debug, Error)]
pub enum AppError {
    /// Caught before any store call; surfaced inline next to the form.
    #[error("{0}")]
    Validation(String),

    /// Store operation failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Session provider operation failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Checkout failed partway; the user sees one generic message, the
    /// source keeps the real cause for the logs.
    #[error("could not place your order, please try again")]
    Checkout {
        #[source]
        source: StoreError,
    },

    /// First-login provisioning failed; retryable via the bootstrap.
    #[error("provisioning failed: {0}")]
    Provisioning(String),
}

/// Result type for application operations
pub type AppResult<T> = Result<T, AppError>;
