//! In-memory store client for testing
//!
//! Deterministic, configurable fetch behavior without network dependencies.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::traits::{SecretPayload, StoreClient, StoreError, StoreResult};
use crate::types::KvVersion;

/// Failure injected into every fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Fetches succeed when the path is known
    #[default]
    None,
    /// Every fetch reports a missing path
    NotFound,
    /// Every fetch reports rejected credentials
    Unauthorized,
    /// Every fetch reports a store-side failure
    ServerError,
}

/// In-memory store client
///
/// Secrets are keyed by `(mount, path)`; fetches are counted so tests can
/// assert cache behavior.
#[derive(Debug, Default)]
pub struct MemoryStoreClient {
    address: String,
    secrets: RwLock<HashMap<(String, String), SecretPayload>>,
    failure: FailureMode,
    delay: Option<Duration>,
    fetch_count: AtomicUsize,
}

impl MemoryStoreClient {
    /// Create an empty client for the given address
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// Seed a secret payload at `mount`/`path`
    pub fn with_secret(
        self,
        mount: impl Into<String>,
        path: impl Into<String>,
        payload: SecretPayload,
    ) -> Self {
        self.secrets
            .write()
            .insert((mount.into(), path.into()), payload);
        self
    }

    /// Seed a single key/value at `mount`/`path`
    pub fn with_secret_value(
        self,
        mount: impl Into<String>,
        path: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let mut payload = SecretPayload::new();
        payload.insert(key.into(), value.into());
        self.with_secret(mount, path, payload)
    }

    /// Make every fetch fail with the given mode
    pub fn with_failure(mut self, failure: FailureMode) -> Self {
        self.failure = failure;
        self
    }

    /// Delay every fetch (for timeout tests)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of fetches issued against this client
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreClient for MemoryStoreClient {
    fn name(&self) -> &str {
        "memory"
    }

    fn address(&self) -> &str {
        &self.address
    }

    async fn fetch_secret(
        &self,
        mount: &str,
        path: &str,
        _kv_version: KvVersion,
        _secret_version: Option<&str>,
    ) -> StoreResult<SecretPayload> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.failure {
            FailureMode::None => {}
            FailureMode::NotFound => return Err(StoreError::NotFound),
            FailureMode::Unauthorized => return Err(StoreError::Unauthorized),
            FailureMode::ServerError => return Err(StoreError::ServerError),
        }

        self.secrets
            .read()
            .get(&(mount.to_string(), path.to_string()))
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_seeded_secret() {
        let client = MemoryStoreClient::new("https://mem").with_secret_value(
            "secret", "app", "pw", "s3cr3t",
        );

        let payload = client
            .fetch_secret("secret", "app", KvVersion::V2, None)
            .await
            .unwrap();
        assert_eq!(payload.get("pw").map(String::as_str), Some("s3cr3t"));
        assert_eq!(client.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let client = MemoryStoreClient::new("https://mem");
        let err = client
            .fetch_secret("secret", "absent", KvVersion::V2, None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let client =
            MemoryStoreClient::new("https://mem").with_failure(FailureMode::Unauthorized);
        let err = client
            .fetch_secret("secret", "app", KvVersion::V2, None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unauthorized));
    }
}
