//! Cache invalidation through the save hooks

use std::sync::Arc;

use crate::linker::cache::{KeyValueCache, MemoryCache};
use crate::linker::conductor::{LinkConductor, RenderSource};
use crate::linker::config::LinkerConfig;
use crate::linker::error::{LinkerError, Result};
use crate::linker::hooks::SaveHooks;
use crate::linker::source::InMemoryVocabulary;
use crate::linker::types::{Document, DocumentId, EntryRecord};

struct Fixture {
    vocabulary: Arc<InMemoryVocabulary>,
    conductor: Arc<LinkConductor>,
    hooks: SaveHooks,
}

fn fixture() -> Fixture {
    let vocabulary = Arc::new(InMemoryVocabulary::new(vec![
        EntryRecord::new(1u64, "Kora", "/dictionary/kora"),
    ]));
    let conductor = Arc::new(
        LinkConductor::new(
            LinkerConfig::default(),
            Arc::new(MemoryCache::new()),
            vocabulary.clone(),
            vocabulary.clone(),
        )
        .unwrap(),
    );
    let mut hooks = SaveHooks::new();
    conductor.register_hooks(&mut hooks);
    Fixture {
        vocabulary,
        conductor,
        hooks,
    }
}

#[test]
fn test_document_save_drops_only_that_document() {
    let f = fixture();
    let a = Document::new(10u64, "post", "Kora");
    let b = Document::new(11u64, "post", "Kora");
    f.conductor.render_linked_content(&a);
    f.conductor.render_linked_content(&b);

    f.hooks.fire_document_saved(&a.id);

    assert_eq!(f.conductor.render_with_stats(&a).stats.source, RenderSource::Linked);
    assert_eq!(f.conductor.render_with_stats(&b).stats.source, RenderSource::DocumentCache);
}

#[test]
fn test_edited_document_is_relinked() {
    let f = fixture();
    f.conductor.render_linked_content(&Document::new(10u64, "post", "Kora"));
    f.hooks.fire_document_saved(&DocumentId::from(10u64));
    let out = f.conductor.render_linked_content(&Document::new(10u64, "post", "No terms here"));
    assert_eq!(out, "No terms here");
}

#[test]
fn test_vocabulary_save_rebuilds_index() {
    let f = fixture();
    f.conductor.render_linked_content(&Document::new(10u64, "post", "Kora"));

    f.vocabulary.upsert(EntryRecord::new(2u64, "Balafon", "/dictionary/balafon"));
    f.hooks.fire_vocabulary_saved(&DocumentId::from(2u64));

    let out = f.conductor.render_with_stats(&Document::new(11u64, "post", "Balafon and Kora"));
    assert!(!out.stats.term_cache_hit);
    assert!(!out.stats.cortex_reused);
    assert_eq!(out.stats.term_count, 2);
    assert_eq!(out.stats.link.links_inserted, 2);
}

#[test]
fn test_vocabulary_save_keeps_other_documents_cached() {
    // Accepted staleness: other pages keep their old output until saved
    let f = fixture();
    let doc = Document::new(10u64, "post", "Kora and Balafon");
    let before = f.conductor.render_linked_content(&doc);

    f.vocabulary.upsert(EntryRecord::new(2u64, "Balafon", "/dictionary/balafon"));
    f.hooks.fire_vocabulary_saved(&DocumentId::from(2u64));

    let after = f.conductor.render_with_stats(&doc);
    assert_eq!(after.stats.source, RenderSource::DocumentCache);
    assert_eq!(after.html, before);
}

#[test]
fn test_vocabulary_save_drops_entry_page() {
    let f = fixture();
    let entry_page = Document::new(1u64, "dictionary", "Kora is a harp.");
    f.conductor.render_linked_content(&entry_page);

    f.hooks.fire_vocabulary_saved(&DocumentId::from(1u64));

    assert_eq!(f.conductor.render_with_stats(&entry_page).stats.source, RenderSource::Linked);
}

#[test]
fn test_term_cache_invalidate_forces_rebuild() {
    let f = fixture();
    let first = f.conductor.render_with_stats(&Document::new(10u64, "post", "Kora"));
    assert!(!first.stats.term_cache_hit);

    let cached = f.conductor.render_with_stats(&Document::new(11u64, "post", "Kora"));
    assert!(cached.stats.term_cache_hit);

    f.conductor.invalidate_term_index();
    let rebuilt = f.conductor.render_with_stats(&Document::new(12u64, "post", "Kora"));
    assert!(!rebuilt.stats.term_cache_hit);
    // Same terms, so the compiled cortex survives the rebuild
    assert!(rebuilt.stats.cortex_reused);
}

/// Backend that is always down
struct DownCache;

impl KeyValueCache for DownCache {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(LinkerError::cache("connection refused"))
    }

    fn set(&self, _key: &str, _value: &str, _ttl: Option<std::time::Duration>) -> Result<()> {
        Err(LinkerError::cache("connection refused"))
    }

    fn delete(&self, _key: &str) -> Result<()> {
        Err(LinkerError::cache("connection refused"))
    }
}

#[test]
fn test_cache_outage_computes_fresh() {
    let vocabulary = Arc::new(InMemoryVocabulary::new(vec![EntryRecord::new(1u64, "Kora", "/k")]));
    let conductor = Arc::new(
        LinkConductor::new(LinkerConfig::default(), Arc::new(DownCache), vocabulary.clone(), vocabulary)
            .unwrap(),
    );
    let doc = Document::new(10u64, "post", "Kora");
    let first = conductor.render_with_stats(&doc);
    let second = conductor.render_with_stats(&doc);
    assert_eq!(first.stats.source, RenderSource::Linked);
    assert_eq!(second.stats.source, RenderSource::Linked);
    assert_eq!(first.html, second.html);
    // Invalidation against a dead backend is logged, not raised
    conductor.on_vocabulary_saved(&DocumentId::from(1u64));
}
