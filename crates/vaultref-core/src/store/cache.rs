//! Per-address store client cache

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::traits::{StoreClient, StoreResult};
use super::vault::VaultClient;
use crate::auth::AuthMethod;

/// Factory building a client for a normalized address
pub type ClientFactory = Arc<
    dyn Fn(&str, &AuthMethod, Option<&str>) -> StoreResult<Arc<dyn StoreClient>> + Send + Sync,
>;

/// Normalize a store address for cache keying
///
/// Lower-cases and strips one trailing slash, so addresses differing only
/// in case or a trailing slash share one live client.
pub fn normalize_store_address(address: &str) -> String {
    let lowered = address.trim().to_lowercase();
    lowered
        .strip_suffix('/')
        .map(str::to_string)
        .unwrap_or(lowered)
}

/// Cache of one long-lived client per normalized store address
///
/// Creation is lazy and at-most-once per key: the entry API holds the
/// shard lock while the factory runs, so concurrent first-callers cannot
/// build two clients for the same key. No eviction; clients live as long
/// as the cache.
pub struct StoreClientCache {
    clients: DashMap<String, Arc<dyn StoreClient>>,
    factory: ClientFactory,
}

impl StoreClientCache {
    /// Create a cache building [`VaultClient`]s
    pub fn new() -> Self {
        Self::with_factory(Arc::new(|address, auth, namespace| {
            Ok(Arc::new(VaultClient::new(
                address,
                auth.clone(),
                namespace.map(str::to_string),
            )?) as Arc<dyn StoreClient>)
        }))
    }

    /// Create a cache with a custom client factory
    pub fn with_factory(factory: ClientFactory) -> Self {
        Self {
            clients: DashMap::new(),
            factory,
        }
    }

    /// Get the client for an address, creating it on first use
    pub fn get_or_create(
        &self,
        address: &str,
        auth: &AuthMethod,
        namespace: Option<&str>,
    ) -> StoreResult<Arc<dyn StoreClient>> {
        let key = normalize_store_address(address);
        match self.clients.entry(key) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let client = (self.factory)(entry.key(), auth, namespace)?;
                entry.insert(Arc::clone(&client));
                Ok(client)
            }
        }
    }

    /// Number of live clients
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether any client has been created yet
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl Default for StoreClientCache {
    fn default() -> Self {
        Self::new()
    }
}
