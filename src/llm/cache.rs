//! TTL cache for AI-generated responses.
//!
//! Entries are persisted through the [`Store`] so identical generation
//! requests are served from the cache across processes.
//!
//! # Caching Strategy
//!
//! The cache is a memoized idempotent computation, not a bounded working set:
//! there is no size limit and no LRU. TTL is the only eviction mechanism, and
//! it runs lazily. An expired entry is deleted by the read that finds it.
//!
//! # Usage
//!
//! ```ignore
//! use launchpad::llm::cache::ResponseCache;
//!
//! let cache = ResponseCache::new(store.clone());
//! cache.put("blurb_Todo App", &prompt, &payload, None).await?;
//!
//! if let Some(payload) = cache.get("blurb_Todo App").await {
//!     // cache hit
//! }
//! ```

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::metrics;
use crate::storage::Store;

/// Default time-to-live: 7 days.
pub const DEFAULT_TTL_MS: i64 = 604_800_000;

/// One cached response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Deterministic key derived from the generation request.
    pub key: String,
    /// The prompt that produced the response.
    pub prompt: String,
    /// The parsed response payload.
    pub response: serde_json::Value,
    pub created_at: DateTime<Utc>,
    /// Time-to-live in milliseconds.
    pub ttl_ms: i64,
}

impl CacheEntry {
    /// An entry is expired once its age strictly exceeds its TTL.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at > Duration::milliseconds(self.ttl_ms)
    }
}

/// Store-backed response cache.
#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn Store>,
    default_ttl_ms: i64,
}

impl ResponseCache {
    /// Create a cache with the 7-day default TTL.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_default_ttl(store, DEFAULT_TTL_MS)
    }

    /// Create a cache whose `put` falls back to `default_ttl_ms`.
    pub fn with_default_ttl(store: Arc<dyn Store>, default_ttl_ms: i64) -> Self {
        Self {
            store,
            default_ttl_ms,
        }
    }

    pub fn default_ttl_ms(&self) -> i64 {
        self.default_ttl_ms
    }

    /// Look up a payload.
    ///
    /// Fails closed: a store error is logged and reported as a miss.
    pub async fn get(&self, key: &str) -> Option<serde_json::Value> {
        match self.try_get(key).await {
            Ok(Some(payload)) => {
                tracing::debug!(key = %key, "AI cache hit");
                metrics::record_cache_lookup("hit");
                Some(payload)
            }
            Ok(None) => {
                tracing::debug!(key = %key, "AI cache miss");
                metrics::record_cache_lookup("miss");
                None
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "AI cache lookup failed, treating as miss");
                metrics::record_cache_lookup("error");
                None
            }
        }
    }

    async fn try_get(&self, key: &str) -> Result<Option<serde_json::Value>, CacheError> {
        let entry = match self.store.get_cache_entry(key).await? {
            Some(entry) => entry,
            None => return Ok(None),
        };

        if entry.is_expired(Utc::now()) {
            tracing::debug!(key = %key, "AI cache entry expired, evicting");
            self.store.delete_cache_entry(key).await?;
            return Ok(None);
        }

        Ok(Some(entry.response))
    }

    /// Insert or overwrite an entry, resetting its age.
    ///
    /// `ttl_ms` defaults to the cache's default TTL when `None`.
    pub async fn put(
        &self,
        key: &str,
        prompt: &str,
        payload: &serde_json::Value,
        ttl_ms: Option<i64>,
    ) -> Result<(), CacheError> {
        let entry = CacheEntry {
            key: key.to_string(),
            prompt: prompt.to_string(),
            response: payload.clone(),
            created_at: Utc::now(),
            ttl_ms: ttl_ms.unwrap_or(self.default_ttl_ms),
        };
        self.store.upsert_cache_entry(&entry).await?;
        Ok(())
    }
}
