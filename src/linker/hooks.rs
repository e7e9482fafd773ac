//! Save hooks: where the host announces writes so caches can be invalidated
//!
//! A dictionary entry is also a document, so hosts that fire both hooks for
//! one entry save are expected; both handlers are idempotent.

use crate::linker::types::DocumentId;

pub type SaveCallback = Box<dyn Fn(&DocumentId) + Send + Sync>;

/// Registry of save callbacks
#[derive(Default)]
pub struct SaveHooks {
    vocabulary_saved: Vec<SaveCallback>,
    document_saved: Vec<SaveCallback>,
}

impl SaveHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `callback` whenever a vocabulary entry is created, updated or deleted
    pub fn on_vocabulary_saved<F>(&mut self, callback: F)
    where
        F: Fn(&DocumentId) + Send + Sync + 'static,
    {
        self.vocabulary_saved.push(Box::new(callback));
    }

    /// Run `callback` whenever any document is saved
    pub fn on_document_saved<F>(&mut self, callback: F)
    where
        F: Fn(&DocumentId) + Send + Sync + 'static,
    {
        self.document_saved.push(Box::new(callback));
    }

    pub fn fire_vocabulary_saved(&self, id: &DocumentId) {
        for callback in &self.vocabulary_saved {
            callback(id);
        }
    }

    pub fn fire_document_saved(&self, id: &DocumentId) {
        for callback in &self.document_saved {
            callback(id);
        }
    }

    pub fn callback_count(&self) -> usize {
        self.vocabulary_saved.len() + self.document_saved.len()
    }
}
