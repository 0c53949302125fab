//! Cache registry - Central management for all caches.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::{CacheConfig, TypedCache};

type CacheKey = (String, TypeId);

/// Central registry for named, typed caches.
///
/// Caches are keyed by name *and* by their concrete type, so two callers
/// asking for the same name with different key/value types get separate caches.
#[derive(Clone, Default)]
pub struct CacheRegistry {
    caches: Arc<RwLock<HashMap<CacheKey, Box<dyn Any + Send + Sync>>>>,
}

impl CacheRegistry {
    /// Create a new empty cache registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an existing cache or create a new one if it doesn't exist.
    pub fn get_or_create<K, V>(&self, name: &str, config: CacheConfig) -> TypedCache<K, V>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        let key = (name.to_string(), TypeId::of::<TypedCache<K, V>>());

        if let Some(existing) = self
            .caches
            .read()
            .get(&key)
            .and_then(|entry| entry.downcast_ref::<TypedCache<K, V>>())
        {
            return existing.clone();
        }

        let mut caches = self.caches.write();
        // Another caller may have raced us between the read and write locks.
        if let Some(existing) = caches
            .get(&key)
            .and_then(|entry| entry.downcast_ref::<TypedCache<K, V>>())
        {
            return existing.clone();
        }

        debug!("Creating cache: {}", name);
        let cache = TypedCache::new(name, config);
        caches.insert(key, Box::new(cache.clone()));
        cache
    }

    /// Get the number of registered caches.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.caches.read().len()
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let caches = self.caches.read();
        f.debug_struct("CacheRegistry")
            .field("cache_names", &caches.keys().map(|(name, _)| name).collect::<Vec<_>>())
            .finish()
    }
}
