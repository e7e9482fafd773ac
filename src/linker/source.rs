//! Collaborator interfaces consumed by the pipeline, plus an in-memory
//! implementation used by the WASM binding and by tests.

use std::collections::HashMap;
use std::sync::RwLock;
use url::Url;

use crate::linker::error::{LinkerError, Result};
use crate::linker::types::{DocumentId, EntryRecord};

/// The entry store: every published entry of the dictionary type
pub trait VocabularySource: Send + Sync {
    fn list_published_entries(&self) -> Result<Vec<EntryRecord>>;
}

/// Maps a target URL back to the document it points at
pub trait UrlResolver: Send + Sync {
    fn resolve_document_id(&self, url: &str) -> Option<DocumentId>;
}

/// Reduce a URL to the part that identifies a document.
///
/// Scheme, host, query and fragment are ignored, as is a trailing slash, so
/// `https://a.example/dict/word/` and `/dict/word` resolve alike.
pub fn permalink_path(url: &str) -> String {
    let trimmed = url.trim();
    let path = match Url::parse(trimmed) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => trimmed
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    let path = path.trim_end_matches('/');
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

// =============================================================================
// InMemoryVocabulary
// =============================================================================

#[derive(Default)]
struct VocabularyState {
    entries: Vec<EntryRecord>,
    by_path: HashMap<String, DocumentId>,
}

/// Replaceable entry set acting as both entry store and URL resolver
#[derive(Default)]
pub struct InMemoryVocabulary {
    state: RwLock<VocabularyState>,
}

impl InMemoryVocabulary {
    pub fn new(entries: Vec<EntryRecord>) -> Self {
        let vocabulary = Self::default();
        vocabulary.replace(entries);
        vocabulary
    }

    /// Swap the whole entry set
    pub fn replace(&self, entries: Vec<EntryRecord>) {
        let by_path = entries
            .iter()
            .map(|e| (permalink_path(&e.permalink), e.id.clone()))
            .collect();
        match self.state.write() {
            Ok(mut state) => {
                state.entries = entries;
                state.by_path = by_path;
            }
            Err(_) => tracing::warn!("vocabulary lock poisoned, entries not replaced"),
        }
    }

    /// Insert or update one entry by id
    pub fn upsert(&self, entry: EntryRecord) {
        let Ok(mut state) = self.state.write() else {
            tracing::warn!("vocabulary lock poisoned, upsert dropped");
            return;
        };
        state.by_path.retain(|_, id| *id != entry.id);
        state
            .by_path
            .insert(permalink_path(&entry.permalink), entry.id.clone());
        match state.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => state.entries.push(entry),
        }
    }

    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl VocabularySource for InMemoryVocabulary {
    fn list_published_entries(&self) -> Result<Vec<EntryRecord>> {
        self.state
            .read()
            .map(|s| s.entries.clone())
            .map_err(|_| LinkerError::vocabulary("entry set lock poisoned"))
    }
}

impl UrlResolver for InMemoryVocabulary {
    fn resolve_document_id(&self, url: &str) -> Option<DocumentId> {
        let state = self.state.read().ok()?;
        state.by_path.get(&permalink_path(url)).cloned()
    }
}
