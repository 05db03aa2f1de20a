//! Secret resolution orchestration
//!
//! One resolution call runs: value-cache check → reference parse → auth
//! selection → client get-or-create → bounded-time fetch → cache
//! populate. No automatic retry anywhere; a single attempt per call.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::error::{ResolveError, ResolveResult};
use super::path::split_secret_path;
use super::value_cache::ValueCache;
use crate::auth::{select_auth_method, AuthMethod};
use crate::env::{EnvProbe, ProcessEnvProbe};
use crate::log_debug;
use crate::logging::{NoOpLogger, SharedLogger};
use crate::reference::ReferenceMatcher;
use crate::store::{ClientFactory, StoreClientCache};
use crate::types::{CancellationToken, ResolverOptions, SecretReference};

/// Resolves raw reference strings to secret values
///
/// Owns its store-client cache and value cache exclusively. Cheap to keep
/// alive for the process lifetime; also fine to build per configuration
/// load and discard.
pub struct SecretResolver {
    options: ResolverOptions,
    env: Arc<dyn EnvProbe>,
    clients: StoreClientCache,
    values: ValueCache,
    auth: OnceCell<AuthMethod>,
    logger: SharedLogger,
}

impl SecretResolver {
    /// Create a resolver reading the real process environment
    pub fn new(options: ResolverOptions) -> Self {
        Self {
            options,
            env: Arc::new(ProcessEnvProbe::new()),
            clients: StoreClientCache::new(),
            values: ValueCache::new(),
            auth: OnceCell::new(),
            logger: Arc::new(NoOpLogger::new()),
        }
    }

    /// Replace the environment probe (tests inject a fake environment)
    pub fn with_env_probe(mut self, env: Arc<dyn EnvProbe>) -> Self {
        self.env = env;
        self
    }

    /// Replace the store-client factory (tests inject in-memory clients)
    pub fn with_client_factory(mut self, factory: ClientFactory) -> Self {
        self.clients = StoreClientCache::with_factory(factory);
        self
    }

    /// Set the logger
    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    /// The options this resolver was built with
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolve a raw reference to its secret value
    ///
    /// Fails with [`ResolveError::InvalidArgument`] on blank input and
    /// [`ResolveError::InvalidReference`] when the input matches neither
    /// syntax. The fetch is bounded by the configured timeout and linked
    /// to `cancel`; a deadline expiry is [`ResolveError::Timeout`],
    /// distinct from [`ResolveError::Cancelled`].
    pub async fn resolve(
        &self,
        raw_reference: &str,
        cancel: &CancellationToken,
    ) -> ResolveResult<String> {
        if raw_reference.trim().is_empty() {
            return Err(ResolveError::InvalidArgument(
                "reference must not be blank".to_string(),
            ));
        }

        if !self.options.enable_caching {
            return self.resolve_uncached(raw_reference, cancel).await;
        }

        if let Some(value) = self.values.get(raw_reference) {
            log_debug!(
                self.logger,
                "cache hit for {}",
                ReferenceMatcher::mask(raw_reference)
            );
            return Ok(value);
        }

        // The slot serializes concurrent first-resolvers of the same raw
        // string onto one fetch; a failure is not cached.
        self.values
            .get_or_try_insert_with(raw_reference, || {
                self.resolve_uncached(raw_reference, cancel)
            })
            .await
    }

    async fn resolve_uncached(
        &self,
        raw_reference: &str,
        cancel: &CancellationToken,
    ) -> ResolveResult<String> {
        let reference =
            ReferenceMatcher::try_parse(raw_reference).ok_or(ResolveError::InvalidReference)?;
        let masked = reference.masked();

        let address = self.effective_address(&reference)?;
        let auth = self.auth_method()?;
        let client = self
            .clients
            .get_or_create(&address, &auth, self.options.namespace.as_deref())
            .map_err(|source| ResolveError::Store {
                reference: masked.clone(),
                source,
            })?;

        let (mount, path) = split_secret_path(&reference.secret_path);
        let mount = if mount.is_empty() {
            self.options.mount_path.clone()
        } else {
            mount
        };
        let kv_version = self.options.kv_version.effective();

        log_debug!(self.logger, "fetching {masked} via {}", auth.name());

        let fetch = client.fetch_secret(&mount, &path, kv_version, reference.version.as_deref());
        let payload = tokio::select! {
            // Caller cancellation takes precedence over a simultaneous
            // deadline expiry.
            biased;
            _ = cancel.cancelled() => return Err(ResolveError::Cancelled),
            result = tokio::time::timeout(self.options.timeout, fetch) => match result {
                Ok(Ok(payload)) => payload,
                Ok(Err(source)) => {
                    return Err(ResolveError::Store { reference: masked, source })
                }
                Err(_) => {
                    return Err(ResolveError::Timeout {
                        timeout: self.options.timeout,
                        reference: masked,
                    })
                }
            },
        };

        payload
            .get(&reference.secret_key)
            .cloned()
            .ok_or(ResolveError::KeyNotFound { reference: masked })
    }

    /// Synchronous variant of [`resolve`](Self::resolve)
    ///
    /// Blocks the calling thread on the async path with a private
    /// current-thread runtime. Must not be called from async context.
    pub fn resolve_blocking(&self, raw_reference: &str) -> ResolveResult<String> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ResolveError::Configuration(format!("cannot start runtime: {e}")))?;
        runtime.block_on(self.resolve(raw_reference, &CancellationToken::new()))
    }

    /// Effective store address for a parsed reference
    ///
    /// The reference-embedded address is authoritative; the options
    /// address is the fallback when the reference carries none.
    fn effective_address(&self, reference: &SecretReference) -> ResolveResult<String> {
        if !reference.store_address.trim().is_empty() {
            return Ok(reference.store_address.clone());
        }
        self.options
            .store_address
            .clone()
            .ok_or_else(|| ResolveError::Configuration("no store address available".to_string()))
    }

    /// The auth method, selected once and cached for this resolver
    fn auth_method(&self) -> ResolveResult<AuthMethod> {
        self.auth
            .get_or_try_init(|| {
                select_auth_method(&self.options, self.env.as_ref()).map_err(ResolveError::from)
            })
            .map(AuthMethod::clone)
    }
}

impl std::fmt::Debug for SecretResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretResolver")
            .field("options", &self.options)
            .field("cached_values", &self.values.len())
            .field("live_clients", &self.clients.len())
            .finish()
    }
}
