//! Resolver configuration options

use std::time::Duration;

use crate::auth::AuthMethod;
use crate::env::{EnvProbe, VAULT_ADDR_ENV, VAULT_NAMESPACE_ENV};

/// Default mount path when a reference path carries no mount segment
pub const DEFAULT_MOUNT_PATH: &str = "secret";

/// Default per-call fetch timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Key-value engine version selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KvVersion {
    /// KV version 1 (flat paths, no metadata)
    V1,
    /// KV version 2 (`<mount>/data/<path>` convention, versioned)
    V2,
    /// Not specified; the resolver defaults to V2
    #[default]
    Auto,
}

impl KvVersion {
    /// The version actually used on the wire; `Auto` resolves to V2
    pub fn effective(self) -> KvVersion {
        match self {
            KvVersion::Auto => KvVersion::V2,
            other => other,
        }
    }
}

/// Options controlling secret resolution
///
/// Immutable during resolution; build once, then hand to the resolver.
///
/// # Example
///
/// ```
/// use vaultref_core::types::ResolverOptions;
/// use std::time::Duration;
///
/// let options = ResolverOptions::new()
///     .with_store_address("https://vault.example.com")
///     .with_timeout(Duration::from_secs(5))
///     .with_throw_on_resolve_failure(false);
/// ```
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Fallback store address when the reference carries none
    pub store_address: Option<String>,
    /// Explicit auth method; when `None` the selector probes the environment
    pub auth_method: Option<AuthMethod>,
    /// Mount path used for single-segment secret paths
    pub mount_path: String,
    /// Key-value engine version
    pub kv_version: KvVersion,
    /// Abort a full-configuration pass on the first failed reference
    pub throw_on_resolve_failure: bool,
    /// Per-call fetch deadline
    pub timeout: Duration,
    /// Cache resolved values for the process lifetime
    pub enable_caching: bool,
    /// Vault namespace sent with every request
    pub namespace: Option<String>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            store_address: None,
            auth_method: None,
            mount_path: DEFAULT_MOUNT_PATH.to_string(),
            kv_version: KvVersion::Auto,
            throw_on_resolve_failure: true,
            timeout: DEFAULT_TIMEOUT,
            enable_caching: true,
            namespace: None,
        }
    }
}

impl ResolverOptions {
    /// Create options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create options seeded from well-known environment slots
    ///
    /// Reads `VAULT_ADDR` and `VAULT_NAMESPACE` through the given probe.
    /// Auth detection stays lazy; it happens at first resolution.
    pub fn from_env(env: &dyn EnvProbe) -> Self {
        Self {
            store_address: env.get(VAULT_ADDR_ENV),
            namespace: env.get(VAULT_NAMESPACE_ENV),
            ..Self::default()
        }
    }

    /// Set the fallback store address
    pub fn with_store_address(mut self, address: impl Into<String>) -> Self {
        self.store_address = Some(address.into());
        self
    }

    /// Set an explicit auth method
    pub fn with_auth_method(mut self, method: AuthMethod) -> Self {
        self.auth_method = Some(method);
        self
    }

    /// Set the default mount path
    pub fn with_mount_path(mut self, mount: impl Into<String>) -> Self {
        self.mount_path = mount.into();
        self
    }

    /// Set the key-value engine version
    pub fn with_kv_version(mut self, version: KvVersion) -> Self {
        self.kv_version = version;
        self
    }

    /// Set the failure policy for full-configuration passes
    pub fn with_throw_on_resolve_failure(mut self, throw: bool) -> Self {
        self.throw_on_resolve_failure = throw;
        self
    }

    /// Set the per-call fetch deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable the resolved-value cache
    pub fn with_caching(mut self, enabled: bool) -> Self {
        self.enable_caching = enabled;
        self
    }

    /// Set the Vault namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MemoryEnvProbe;

    #[test]
    fn test_defaults() {
        let options = ResolverOptions::new();
        assert_eq!(options.mount_path, "secret");
        assert_eq!(options.kv_version, KvVersion::Auto);
        assert!(options.throw_on_resolve_failure);
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert!(options.enable_caching);
        assert!(options.store_address.is_none());
        assert!(options.namespace.is_none());
    }

    #[test]
    fn test_auto_resolves_to_v2() {
        assert_eq!(KvVersion::Auto.effective(), KvVersion::V2);
        assert_eq!(KvVersion::V1.effective(), KvVersion::V1);
        assert_eq!(KvVersion::V2.effective(), KvVersion::V2);
    }

    #[test]
    fn test_builder_setters() {
        let options = ResolverOptions::new()
            .with_store_address("https://vault.example.com")
            .with_mount_path("kv")
            .with_kv_version(KvVersion::V1)
            .with_throw_on_resolve_failure(false)
            .with_timeout(Duration::from_secs(5))
            .with_caching(false)
            .with_namespace("team-a");

        assert_eq!(
            options.store_address.as_deref(),
            Some("https://vault.example.com")
        );
        assert_eq!(options.mount_path, "kv");
        assert_eq!(options.kv_version, KvVersion::V1);
        assert!(!options.throw_on_resolve_failure);
        assert_eq!(options.timeout, Duration::from_secs(5));
        assert!(!options.enable_caching);
        assert_eq!(options.namespace.as_deref(), Some("team-a"));
    }

    #[test]
    fn test_from_env_reads_well_known_slots() {
        let env = MemoryEnvProbe::new()
            .with_var(VAULT_ADDR_ENV, "https://vault.internal:8200")
            .with_var(VAULT_NAMESPACE_ENV, "platform");

        let options = ResolverOptions::from_env(&env);
        assert_eq!(
            options.store_address.as_deref(),
            Some("https://vault.internal:8200")
        );
        assert_eq!(options.namespace.as_deref(), Some("platform"));
    }

    #[test]
    fn test_from_env_empty() {
        let env = MemoryEnvProbe::new();
        let options = ResolverOptions::from_env(&env);
        assert!(options.store_address.is_none());
        assert!(options.namespace.is_none());
    }
}
