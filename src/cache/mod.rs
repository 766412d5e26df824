//! Query result cache with per-entry expiry
//!
//! Entries are keyed by the normalized query and stored with their creation
//! instant. Freshness is decided at read time; an expired entry is dropped on
//! the read that finds it. Capacity is bounded, least recently used first out.

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::product::Product;

struct CacheEntry {
    products: Arc<Vec<Product>>,
    created_at: Instant,
}

pub struct QueryCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl QueryCache {
    #[must_use]
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Products stored under `key`, if the entry is younger than the TTL
    pub fn get(&self, key: &str) -> Option<Vec<Product>> {
        let mut entries = self.entries.lock();
        let entry = entries.get(key)?;

        let age = entry.created_at.elapsed();
        if age < self.ttl {
            log::debug!("Cache hit for '{key}' (age {age:?})");
            return Some(entry.products.as_ref().clone());
        }

        log::debug!("Cache entry for '{key}' expired after {age:?}");
        entries.pop(key);
        None
    }

    /// Store `products` under `key`, replacing any previous entry
    pub fn put(&self, key: &str, products: Vec<Product>) {
        let entry = CacheEntry {
            products: Arc::new(products),
            created_at: Instant::now(),
        };
        if let Some((evicted, _)) = self.entries.lock().push(key.to_string(), entry)
            && evicted != key
        {
            log::trace!("Query cache at capacity, evicted '{evicted}'");
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, price: u64) -> Product {
        Product::new(name, price, "", "shop.example.com", "https://shop.example.com")
    }

    #[tokio::test(start_paused = true)]
    async fn entry_expires_at_ttl() {
        let cache = QueryCache::new(8, Duration::from_secs(300));
        cache.put("leche", vec![product("Leche", 8000)]);

        tokio::time::advance(Duration::from_secs(299)).await;
        assert_eq!(cache.get("leche").map(|p| p.len()), Some(1));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get("leche").is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn put_overwrites_and_resets_age() {
        let cache = QueryCache::new(8, Duration::from_secs(10));
        cache.put("arroz", vec![product("Arroz", 5000)]);
        tokio::time::advance(Duration::from_secs(8)).await;
        cache.put("arroz", vec![product("Arroz Integral", 7000)]);
        tokio::time::advance(Duration::from_secs(8)).await;

        let hit = cache.get("arroz").unwrap();
        assert_eq!(hit[0].name(), "Arroz Integral");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn least_recently_used_is_evicted() {
        let cache = QueryCache::new(2, Duration::from_secs(60));
        cache.put("a", vec![]);
        cache.put("b", vec![]);
        assert!(cache.get("a").is_some());
        cache.put("c", vec![]);

        assert!(cache.get("b").is_none());
        assert!(cache.get("a").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn empty_results_are_cached() {
        let cache = QueryCache::new(4, Duration::from_secs(60));
        cache.put("nada", Vec::new());
        assert_eq!(cache.get("nada"), Some(Vec::new()));
    }
}
