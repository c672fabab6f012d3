//! Client-side dataset caching.
//!
//! Decoded per-user datasets are kept for a bounded time so that flipping
//! back to a recently viewed user does not hit the backend again. The
//! backend only refreshes its presence data periodically, so a short TTL
//! never shows data older than the server would serve anyway.
//!
//! # Usage
//!
//! ```text
//! let key = cache::cache_key(variant.endpoint(), &[&user_id.to_string()]);
//!
//! if let Some(hit) = cache.get(&key).await {
//!     return Ok(hit);
//! }
//!
//! // ... fetch from the backend ...
//!
//! cache.insert(key, dataset.clone()).await;
//! ```
//!
//! Only datasets that build into a chart are stored. A cached dataset still
//! goes through the selection token check before it is drawn.

use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use crate::chart::Dataset;
use crate::config::Config;

/// Build a cache key from a prefix and components.
///
/// Components are joined with `:` separator. Empty components are included
/// to ensure different queries produce different keys.
pub fn cache_key(prefix: &str, components: &[&str]) -> String {
    let mut key = prefix.to_string();
    for c in components {
        key.push(':');
        key.push_str(c);
    }
    key
}

#[derive(Clone)]
pub struct DatasetCache {
    inner: Cache<String, Arc<Dataset>>,
}

impl DatasetCache {
    #[must_use]
    pub fn new(ttl: Duration, max_entries: u64) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_entries)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Cache sized from config, or `None` when the TTL is zero.
    #[must_use]
    pub fn from_config(config: &Config) -> Option<Self> {
        (config.dataset_cache_ttl_seconds > 0).then(|| {
            Self::new(
                Duration::from_secs(config.dataset_cache_ttl_seconds),
                config.dataset_cache_max_entries,
            )
        })
    }

    pub async fn get(&self, cache_key: &str) -> Option<Arc<Dataset>> {
        let hit = self.inner.get(cache_key).await;
        if hit.is_some() {
            tracing::debug!(cache_key = %cache_key, "cache_hit");
        }
        hit
    }

    pub async fn insert(&self, cache_key: String, dataset: Arc<Dataset>) {
        let rows = dataset.len();
        self.inner.insert(cache_key.clone(), dataset).await;
        tracing::debug!(cache_key = %cache_key, rows, "cache_stored");
    }

    /// Manually invalidate a cache entry.
    pub async fn invalidate(&self, cache_key: &str) {
        self.inner.invalidate(cache_key).await;
        tracing::debug!(cache_key = %cache_key, "cache_invalidated");
    }
}
