//! DocumentCache: linked HTML per document

use std::sync::Arc;
use std::time::Duration;

use crate::linker::cache::KeyValueCache;
use crate::linker::config::LinkerConfig;
use crate::linker::fingerprint::document_cache_key;
use crate::linker::types::DocumentId;

/// Document Cache over a shared key-value store. Keys carry the plugin
/// version, so an upgrade never serves pre-upgrade output.
pub struct DocumentCache {
    store: Arc<dyn KeyValueCache>,
    config: LinkerConfig,
}

impl DocumentCache {
    pub fn new(store: Arc<dyn KeyValueCache>, config: &LinkerConfig) -> Self {
        Self {
            store,
            config: config.clone(),
        }
    }

    pub fn key(&self, id: &DocumentId) -> String {
        document_cache_key(&self.config, id)
    }

    /// Cached HTML, or `None` on miss. An empty string counts as a miss.
    pub fn get(&self, id: &DocumentId) -> Option<String> {
        match self.store.get(&self.key(id)) {
            Ok(Some(html)) if !html.is_empty() => Some(html),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(document = %id, error = %e, "document cache read failed");
                None
            }
        }
    }

    pub fn set(&self, id: &DocumentId, html: &str, ttl: Option<Duration>) {
        if let Err(e) = self.store.set(&self.key(id), html, ttl) {
            tracing::warn!(document = %id, error = %e, "document cache write failed");
        }
    }

    pub fn invalidate(&self, id: &DocumentId) {
        if let Err(e) = self.store.delete(&self.key(id)) {
            tracing::warn!(document = %id, error = %e, "document cache invalidate failed");
        }
    }
}
