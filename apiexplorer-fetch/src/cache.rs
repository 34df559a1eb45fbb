//! Session response cache.
//!
//! Entries are keyed by request kind and fully resolved URL. There is no TTL
//! and no eviction: the cache lives as long as the client and is only
//! dropped wholesale.

use std::collections::HashMap;

use apiexplorer_core::ApiResult;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Which client operation produced a cached result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Status probe.
    Connect,
    /// Resource fetch.
    Data,
}

/// Cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Operation kind.
    pub kind: RequestKind,
    /// Resolved URL.
    pub url: String,
}

impl CacheKey {
    /// Key for a status probe of `url`.
    pub fn connect(url: impl Into<String>) -> Self {
        Self {
            kind: RequestKind::Connect,
            url: url.into(),
        }
    }

    /// Key for a resource fetch of `url`.
    pub fn data(url: impl Into<String>) -> Self {
        Self {
            kind: RequestKind::Data,
            url: url.into(),
        }
    }
}

/// A memoized result.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached result.
    pub result: ApiResult,
    /// When it was stored.
    pub stored_at: DateTime<Utc>,
}

/// Response cache owned by the client.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: HashMap<CacheKey, CacheEntry>,
}

impl ResponseCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached result for `key`.
    pub fn get(&self, key: &CacheKey) -> Option<&ApiResult> {
        self.entries.get(key).map(|entry| &entry.result)
    }

    /// Returns the full entry for `key`.
    pub fn entry(&self, key: &CacheKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Stores `result` under `key`.
    ///
    /// Rate-limited results are refused; returns whether the result was stored.
    pub fn insert(&mut self, key: CacheKey, result: ApiResult) -> bool {
        if result.is_rate_limited() {
            debug!(url = %key.url, "Not caching rate-limited result");
            return false;
        }
        self.entries.insert(
            key,
            CacheEntry {
                result,
                stored_at: Utc::now(),
            },
        );
        true
    }

    /// Drops all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiexplorer_core::FailureKind;
    use serde_json::json;

    #[test]
    fn test_kinds_do_not_collide() {
        let mut cache = ResponseCache::new();
        let url = "https://api.example.com/status";

        cache.insert(CacheKey::connect(url), ApiResult::success(200, None, "up"));
        assert!(cache.get(&CacheKey::data(url)).is_none());
        assert_eq!(cache.get(&CacheKey::connect(url)).unwrap().message(), "up");
    }

    #[test]
    fn test_rate_limited_results_are_refused() {
        let mut cache = ResponseCache::new();
        let limited = ApiResult::failure(
            FailureKind::RateLimited {
                retry_after_secs: None,
            },
            Some(429),
            "slow down",
        );

        assert!(!cache.insert(CacheKey::data("https://a/x"), limited));
        assert!(cache.is_empty());

        let denied = ApiResult::failure(FailureKind::Authentication, Some(401), "no");
        assert!(cache.insert(CacheKey::connect("https://a/x"), denied));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cache = ResponseCache::new();
        cache.insert(
            CacheKey::data("https://a/products"),
            ApiResult::success(200, Some(json!([])), "ok"),
        );
        assert!(cache.entry(&CacheKey::data("https://a/products")).is_some());

        cache.clear();
        assert!(cache.is_empty());
    }
}
