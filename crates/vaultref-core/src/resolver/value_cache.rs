//! Resolved-value cache

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;

/// Cache of raw reference string → resolved secret value
///
/// Each raw string owns one once-only slot: concurrent resolutions of the
/// same string share a single in-flight fetch, and a failed attempt leaves
/// the slot empty so the next caller retries. Once populated the entry is
/// never invalidated within the process lifetime; secrets are assumed
/// stable while the process runs. A rotated upstream secret is not
/// observed until restart.
#[derive(Debug, Default)]
pub struct ValueCache {
    entries: DashMap<String, Arc<OnceCell<String>>>,
}

impl ValueCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an already-resolved value by raw reference string
    pub fn get(&self, raw_reference: &str) -> Option<String> {
        self.entries
            .get(raw_reference)
            .and_then(|cell| cell.get().cloned())
    }

    /// Resolve through the cache, running `init` at most once per key
    ///
    /// Concurrent callers for the same raw string wait on the same slot
    /// instead of racing duplicate fetches. An `Err` from `init` is
    /// returned to the caller and not cached.
    pub async fn get_or_try_insert_with<F, Fut, E>(
        &self,
        raw_reference: &str,
        init: F,
    ) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        let cell = Arc::clone(
            self.entries
                .entry(raw_reference.to_string())
                .or_default()
                .value(),
        );
        cell.get_or_try_init(init).await.map(Clone::clone)
    }

    /// Number of cached values
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value().initialized())
            .count()
    }

    /// Whether the cache holds no values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
