//! TermCache: the realized TermIndex, keyed by site fingerprint

use std::sync::Arc;
use std::time::Duration;

use crate::linker::cache::KeyValueCache;
use crate::linker::config::LinkerConfig;
use crate::linker::fingerprint::term_cache_key;
use crate::linker::index::TermIndex;

/// Term Cache over a shared key-value store.
///
/// Backend failures are logged and read as a miss; the caller rebuilds.
pub struct TermCache {
    store: Arc<dyn KeyValueCache>,
    key: String,
}

impl TermCache {
    pub fn new(store: Arc<dyn KeyValueCache>, config: &LinkerConfig) -> Self {
        Self {
            store,
            key: term_cache_key(config),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Cached index, or `None` on miss. An empty snapshot counts as a miss.
    pub fn get(&self) -> Option<TermIndex> {
        let payload = match self.store.get(&self.key) {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "term cache read failed");
                return None;
            }
        };
        match serde_json::from_str::<TermIndex>(&payload) {
            Ok(index) if !index.is_empty() => Some(index),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "discarding undecodable term snapshot");
                None
            }
        }
    }

    pub fn set(&self, index: &TermIndex, ttl: Option<Duration>) {
        let payload = match serde_json::to_string(index) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "could not encode term index");
                return;
            }
        };
        if let Err(e) = self.store.set(&self.key, &payload, ttl) {
            tracing::warn!(error = %e, "term cache write failed");
        }
    }

    /// Drop the snapshot; the next `get` misses
    pub fn invalidate(&self) {
        if let Err(e) = self.store.delete(&self.key) {
            tracing::warn!(error = %e, "term cache invalidate failed");
        }
    }
}
