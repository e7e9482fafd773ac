use std::sync::Arc;
use wasm_bindgen::prelude::*;

use crate::linker::cache::MemoryCache;
use crate::linker::conductor::LinkConductor;
use crate::linker::config::LinkerConfig;
use crate::linker::cortex::LinkCortex;
use crate::linker::hooks::SaveHooks;
use crate::linker::source::InMemoryVocabulary;
use crate::linker::types::{Document, DocumentId, EntryRecord};

/// Self-contained auto-linker for JS hosts: in-memory vocabulary and caches
#[wasm_bindgen]
pub struct AutoLinker {
    conductor: Arc<LinkConductor>,
    vocabulary: Arc<InMemoryVocabulary>,
    hooks: SaveHooks,
}

#[wasm_bindgen]
impl AutoLinker {
    /// Expects an optional config object; missing fields take defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<AutoLinker, JsValue> {
        let config: LinkerConfig = if config.is_undefined() || config.is_null() {
            LinkerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {}", e)))?
        };

        let vocabulary = Arc::new(InMemoryVocabulary::default());
        let conductor = LinkConductor::new(
            config,
            Arc::new(MemoryCache::new()),
            vocabulary.clone(),
            vocabulary.clone(),
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let conductor = Arc::new(conductor);

        let mut hooks = SaveHooks::new();
        conductor.register_hooks(&mut hooks);

        Ok(AutoLinker {
            conductor,
            vocabulary,
            hooks,
        })
    }

    /// Replace the vocabulary. Expects array of { id, title, permalink }
    #[wasm_bindgen(js_name = hydrateEntries)]
    pub fn hydrate_entries(&mut self, entries: JsValue) -> Result<usize, JsValue> {
        let entries: Vec<EntryRecord> = serde_wasm_bindgen::from_value(entries)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse entries: {}", e)))?;
        let count = entries.len();
        self.vocabulary.replace(entries);
        self.conductor.invalidate_term_index();
        Ok(count)
    }

    /// Insert or update a single entry, then fire the vocabulary hook
    #[wasm_bindgen(js_name = upsertEntry)]
    pub fn upsert_entry(&mut self, entry: JsValue) -> Result<(), JsValue> {
        let entry: EntryRecord = serde_wasm_bindgen::from_value(entry)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse entry: {}", e)))?;
        let id = entry.id.clone();
        self.vocabulary.upsert(entry);
        self.hooks.fire_vocabulary_saved(&id);
        Ok(())
    }

    /// Linked HTML for one document, served from cache when possible
    #[wasm_bindgen]
    pub fn render(&self, id: &str, kind: &str, content: &str) -> String {
        self.conductor
            .render_linked_content(&Document::new(id, kind, content))
    }

    /// Render and return `{ html, stats }`
    #[wasm_bindgen(js_name = renderWithStats)]
    pub fn render_with_stats(&self, id: &str, kind: &str, content: &str) -> Result<JsValue, JsValue> {
        let outcome = self
            .conductor
            .render_with_stats(&Document::new(id, kind, content));
        serde_wasm_bindgen::to_value(&outcome).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// One uncached link pass over `content`
    #[wasm_bindgen]
    pub fn link(&self, content: &str, current_id: &str) -> Result<String, JsValue> {
        let index = self.conductor.term_index();
        let cortex = LinkCortex::compile(&index, self.conductor.config())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(cortex.link(content, self.vocabulary.as_ref(), &DocumentId::from(current_id)))
    }

    #[wasm_bindgen(js_name = vocabularySaved)]
    pub fn vocabulary_saved(&self, id: &str) {
        self.hooks.fire_vocabulary_saved(&DocumentId::from(id));
    }

    #[wasm_bindgen(js_name = documentSaved)]
    pub fn document_saved(&self, id: &str) {
        self.hooks.fire_document_saved(&DocumentId::from(id));
    }

    /// Returns { entries, terms, cortexReuseRate }
    #[wasm_bindgen]
    pub fn stats(&self) -> Result<JsValue, JsValue> {
        let stats = serde_json::json!({
            "entries": self.vocabulary.len(),
            "terms": self.conductor.term_index().len(),
            "cortexReuseRate": self.conductor.cortex_reuse_rate(),
        });
        serde_wasm_bindgen::to_value(&stats).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
