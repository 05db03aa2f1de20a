//! Store client trait and error types

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::KvVersion;

/// Key→value mapping fetched from a secret path
pub type SecretPayload = HashMap<String, String>;

/// Errors from talking to a secret store
///
/// Variants carry no secret identifiers; the resolver adds masked context
/// when it wraps them.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Network error reaching the store
    #[error("network error communicating with the secret store")]
    Network(#[from] reqwest::Error),

    /// Authentication rejected (401/403)
    #[error("secret store authentication failed (check credentials and policies)")]
    Unauthorized,

    /// Login flow failed before a session token was issued
    #[error("secret store login failed: {0}")]
    Auth(String),

    /// No secret at the requested path (404)
    #[error("no secret at the requested path")]
    NotFound,

    /// Rate limit exceeded (429)
    #[error("secret store rate limit exceeded")]
    RateLimited,

    /// Store-side failure (5xx)
    #[error("secret store server error")]
    ServerError,

    /// Any other status
    #[error("unexpected secret store response: status {0}")]
    UnexpectedStatus(u16),

    /// Payload did not have the expected shape
    #[error("invalid secret store response: {0}")]
    InvalidResponse(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A client session against one secret store address
///
/// Implementations:
/// - `VaultClient`: HashiCorp Vault over HTTP
/// - `MemoryStoreClient`: in-memory for testing
///
/// Clients are cached per normalized address (see
/// [`super::StoreClientCache`]) and live for the cache's lifetime.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Short name of the backing store kind (e.g. "vault", "memory")
    fn name(&self) -> &str;

    /// The normalized address this client is bound to
    fn address(&self) -> &str;

    /// Fetch the secret payload at `mount`/`path`
    ///
    /// `secret_version` selects a KV v2 secret version; ignored for V1.
    /// A missing path is [`StoreError::NotFound`], not an empty payload.
    async fn fetch_secret(
        &self,
        mount: &str,
        path: &str,
        kv_version: KvVersion,
        secret_version: Option<&str>,
    ) -> StoreResult<SecretPayload>;
}
