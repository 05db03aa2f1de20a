//! Resolver error taxonomy

use std::time::Duration;

use thiserror::Error;

use crate::auth::AuthError;
use crate::store::StoreError;

/// Errors raised by [`super::SecretResolver`]
///
/// Every message carries masked references only; raw secret identifiers
/// never appear in error text.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Bad or missing local input; never retried, always a caller bug
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Input matched neither reference syntax
    #[error(
        "not a recognized secret reference; expected \
         '@Hashicorp.Vault(VaultAddress=<addr>;SecretPath=<path>;SecretKey=<key>)' \
         or 'vault://<host>/<path>#<key>'"
    )]
    InvalidReference,

    /// No usable store address or auth method determinable
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Store reachable, path resolved, requested key absent
    #[error("secret key not found in payload at {reference}")]
    KeyNotFound { reference: String },

    /// Bounded-time fetch exceeded the deadline
    #[error("secret fetch timed out after {timeout:?} for {reference}")]
    Timeout {
        timeout: Duration,
        reference: String,
    },

    /// Caller-initiated cancellation, distinct from a deadline expiry
    #[error("secret resolution cancelled")]
    Cancelled,

    /// Store-client failure, passed through with masked context
    #[error("store error for {reference}")]
    Store {
        reference: String,
        #[source]
        source: StoreError,
    },
}

impl From<AuthError> for ResolveError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidArgument(message) => ResolveError::InvalidArgument(message),
            AuthError::NoMethodResolvable(_) => ResolveError::Configuration(err.to_string()),
        }
    }
}

pub type ResolveResult<T> = Result<T, ResolveError>;
