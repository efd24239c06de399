//! Caching layer for peer lists to avoid re-running slow screens

use crate::api::CompareAxis;
use cached::{Cached, TimedCache};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Cache key for a peer lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerKey {
    /// Stock symbol, upper-cased
    pub ticker: String,
    /// Axes the peers were matched on
    pub axes: Vec<CompareAxis>,
}

impl PeerKey {
    /// Create a new cache key
    pub fn new(ticker: &str, axes: &[CompareAxis]) -> Self {
        Self {
            ticker: ticker.to_uppercase(),
            axes: axes.to_vec(),
        }
    }
}

/// Thread-safe cache of peer lists
#[derive(Clone)]
pub struct PeerCache {
    cache: Arc<RwLock<TimedCache<PeerKey, Vec<String>>>>,
}

impl PeerCache {
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &PeerKey) -> Option<Vec<String>> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache
    pub async fn insert(&self, key: PeerKey, peers: Vec<String>) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, peers);
    }

    /// Get or fetch a value using the provided fetcher function
    ///
    /// Failed fetches are not cached.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: PeerKey, fetcher: F) -> Result<Vec<String>, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<Vec<String>, E>>,
    {
        if let Some(peers) = self.get(&key).await {
            tracing::debug!("Cache hit for key: {:?}", key);
            return Ok(peers);
        }

        tracing::debug!("Cache miss for key: {:?}", key);
        let peers = fetcher().await?;
        self.insert(key, peers.clone()).await;
        Ok(peers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peers(tickers: &[&str]) -> Vec<String> {
        tickers.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_key_is_case_insensitive() {
        let axes = [CompareAxis::Sector, CompareAxis::Industry];
        assert_eq!(PeerKey::new("nio", &axes), PeerKey::new("NIO", &axes));
        assert_ne!(PeerKey::new("NIO", &axes), PeerKey::new("NIO", &axes[..1]));
    }

    #[tokio::test]
    async fn test_cache_get_or_fetch() {
        let cache = PeerCache::new(Duration::from_secs(60));
        let key = PeerKey::new("NIO", &[CompareAxis::Sector]);

        let mut call_count = 0;
        let result = cache
            .get_or_fetch(key.clone(), || {
                call_count += 1;
                async { Ok::<_, String>(peers(&["LI", "XPEV"])) }
            })
            .await
            .unwrap();
        assert_eq!(result, peers(&["LI", "XPEV"]));
        assert_eq!(call_count, 1);

        let result = cache
            .get_or_fetch(key, || {
                call_count += 1;
                async { Ok::<_, String>(Vec::new()) }
            })
            .await
            .unwrap();
        assert_eq!(result, peers(&["LI", "XPEV"]));
        assert_eq!(call_count, 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let cache = PeerCache::new(Duration::from_secs(60));
        let key = PeerKey::new("NIO", &[CompareAxis::Sector]);

        let result = cache
            .get_or_fetch(key.clone(), || async { Err::<Vec<String>, _>("down") })
            .await;
        assert_eq!(result, Err("down"));
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_insert_is_keyed_by_axes() {
        let cache = PeerCache::new(Duration::from_secs(60));
        let key = PeerKey::new("NIO", &[CompareAxis::Sector]);

        cache.insert(key.clone(), peers(&["LI"])).await;
        assert_eq!(cache.get(&key).await, Some(peers(&["LI"])));
        assert!(cache.get(&PeerKey::new("nio", &[])).await.is_none());
    }
}
