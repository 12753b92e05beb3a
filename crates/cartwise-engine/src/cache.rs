//! Bounded TTL cache of normalized store catalogs.
//!
//! Hosts fetch catalogs through external collaborators; this cache lets a
//! repeat request skip the refetch for stores whose catalog is still
//! fresh. It is an explicit, injected collaborator — the engine takes an
//! `Arc<CatalogCache>`, never a process global. Readers see a consistent
//! snapshot; writes go through the `RwLock` one at a time.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;

use cartwise_core::AppConfig;

use crate::catalog::StoreCatalog;

struct CacheEntry {
    catalog: StoreCatalog,
    inserted_at: Instant,
}

pub struct CatalogCache {
    ttl: Duration,
    capacity: usize,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl CatalogCache {
    #[must_use]
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            entries: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Duration::from_secs(config.catalog_ttl_secs),
            config.catalog_cache_capacity,
        )
    }

    /// Returns the cached catalog for `store` if still fresh.
    #[must_use]
    pub fn get(&self, store: &str) -> Option<StoreCatalog> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(store)
            .filter(|e| e.inserted_at.elapsed() < self.ttl)
            .map(|e| e.catalog.clone())
    }

    /// All fresh catalogs currently cached.
    #[must_use]
    pub fn fresh_catalogs(&self) -> Vec<StoreCatalog> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .values()
            .filter(|e| e.inserted_at.elapsed() < self.ttl)
            .map(|e| e.catalog.clone())
            .collect()
    }

    /// Inserts or replaces a store's catalog. When the cache is at
    /// capacity, the oldest entry is evicted first.
    pub fn insert(&self, catalog: StoreCatalog) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if !entries.contains_key(&catalog.store) && entries.len() >= self.capacity {
            let stalest = entries
                .iter()
                .min_by_key(|(_, e)| e.inserted_at)
                .map(|(store, _)| store.clone());
            if let Some(store) = stalest {
                debug!(%store, "evicting stalest catalog from full cache");
                entries.remove(&store);
            }
        }

        entries.insert(
            catalog.store.clone(),
            CacheEntry {
                catalog,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drops a store's cached catalog, fresh or not.
    pub fn invalidate(&self, store: &str) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(store);
    }

    /// Removes every expired entry.
    pub fn purge_expired(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, e| e.inserted_at.elapsed() < self.ttl);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
