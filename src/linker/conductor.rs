//! LinkConductor: request-scoped render coordinator
//!
//! # Flow
//! 1. Kind gate: only `linkable_kinds` are touched
//! 2. Document Cache hit → done
//! 3. Term Cache hit, or rebuild the TermIndex from the vocabulary source
//! 4. Compile (or reuse) the LinkCortex and run one link pass
//! 5. Store the linked HTML in the Document Cache
//!
//! Every failure on this path falls back to the raw content. Nothing here
//! holds a lock across the link pass; concurrent misses for the same
//! document each do the work (no single-flight).
//!
//! # Usage
//! ```rust,ignore
//! let conductor = Arc::new(LinkConductor::new(config, store, vocabulary.clone(), vocabulary)?);
//! conductor.register_hooks(&mut hooks);
//! let html = conductor.render_linked_content(&document);
//! ```

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};

use crate::linker::cache::KeyValueCache;
use crate::linker::change::ChangeDetector;
use crate::linker::config::LinkerConfig;
use crate::linker::cortex::{LinkCortex, LinkStats};
use crate::linker::document_cache::DocumentCache;
use crate::linker::error::Result;
use crate::linker::hooks::SaveHooks;
use crate::linker::index::{TermIndex, TermIndexBuilder};
use crate::linker::source::{UrlResolver, VocabularySource};
use crate::linker::term_cache::TermCache;
use crate::linker::types::{Document, DocumentId};

// =============================================================================
// Types
// =============================================================================

/// Where the returned HTML came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RenderSource {
    /// Document kind is not linkable; raw content returned
    #[default]
    Skipped,
    /// Served from the Document Cache
    DocumentCache,
    /// Freshly linked (and cached)
    Linked,
    /// No vocabulary available; raw content returned
    EmptyVocabulary,
    /// Linking failed; raw content returned
    FailedOpen,
}

/// Statistics for one render
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderStats {
    pub source: RenderSource,
    pub term_cache_hit: bool,
    pub term_count: usize,
    pub cortex_reused: bool,
    pub link: LinkStats,
    pub total_us: u64,
}

/// HTML plus how it was produced
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderOutcome {
    pub html: String,
    pub stats: RenderStats,
}

/// Compiled cortex for the last TermIndex seen
#[derive(Default)]
struct CompiledSlot {
    detector: ChangeDetector,
    cortex: Option<Arc<LinkCortex>>,
}

// =============================================================================
// LinkConductor
// =============================================================================

/// Owns the builder, both caches and the collaborators for rendering
pub struct LinkConductor {
    config: LinkerConfig,
    builder: TermIndexBuilder,
    term_cache: TermCache,
    document_cache: DocumentCache,
    source: Arc<dyn VocabularySource>,
    resolver: Arc<dyn UrlResolver>,
    compiled: Mutex<CompiledSlot>,
}

impl LinkConductor {
    /// Both caches share `store`; their keys do not collide.
    pub fn new(
        config: LinkerConfig,
        store: Arc<dyn KeyValueCache>,
        source: Arc<dyn VocabularySource>,
        resolver: Arc<dyn UrlResolver>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            builder: TermIndexBuilder::new(config.min_headword_chars),
            term_cache: TermCache::new(store.clone(), &config),
            document_cache: DocumentCache::new(store, &config),
            source,
            resolver,
            compiled: Mutex::new(CompiledSlot::default()),
            config,
        })
    }

    pub fn config(&self) -> &LinkerConfig {
        &self.config
    }

    /// Linked HTML for `document`, never failing
    pub fn render_linked_content(&self, document: &Document) -> String {
        self.render_with_stats(document).html
    }

    pub fn render_with_stats(&self, document: &Document) -> RenderOutcome {
        let started = instant::Instant::now();
        let mut stats = RenderStats::default();

        let html = self.render_inner(document, &mut stats);

        stats.total_us = started.elapsed().as_micros() as u64;
        tracing::debug!(
            document = %document.id,
            source = ?stats.source,
            total_us = stats.total_us,
            "document rendered"
        );
        RenderOutcome { html, stats }
    }

    fn render_inner(&self, document: &Document, stats: &mut RenderStats) -> String {
        if !self.config.is_linkable_kind(&document.kind) {
            stats.source = RenderSource::Skipped;
            return document.raw_content.clone();
        }

        if let Some(html) = self.document_cache.get(&document.id) {
            stats.source = RenderSource::DocumentCache;
            return html;
        }

        let (index, cache_hit) = self.load_term_index();
        stats.term_cache_hit = cache_hit;
        stats.term_count = index.len();
        if index.is_empty() {
            stats.source = RenderSource::EmptyVocabulary;
            return document.raw_content.clone();
        }

        let (cortex, reused) = match self.cortex_for(&index) {
            Ok(compiled) => compiled,
            Err(e) => {
                tracing::warn!(document = %document.id, error = %e, "serving document unlinked");
                stats.source = RenderSource::FailedOpen;
                return document.raw_content.clone();
            }
        };
        stats.cortex_reused = reused;

        let outcome = cortex.link_with_stats(&document.raw_content, self.resolver.as_ref(), &document.id);
        stats.link = outcome.stats;
        stats.source = RenderSource::Linked;

        self.document_cache
            .set(&document.id, &outcome.html, self.config.document_cache_ttl());
        outcome.html
    }

    /// Current TermIndex from the Term Cache, rebuilding on a miss
    pub fn term_index(&self) -> TermIndex {
        self.load_term_index().0
    }

    /// Returns the index and whether it came from the Term Cache
    fn load_term_index(&self) -> (TermIndex, bool) {
        if let Some(index) = self.term_cache.get() {
            return (index, true);
        }

        let index = self.builder.build(self.source.as_ref());
        if !index.is_empty() {
            self.term_cache.set(&index, self.config.term_cache_ttl());
            tracing::debug!(terms = index.len(), "term index rebuilt");
        }
        (index, false)
    }

    /// Cortex for `index`, recompiled only if its terms changed
    fn cortex_for(&self, index: &TermIndex) -> Result<(Arc<LinkCortex>, bool)> {
        let mut slot = self.compiled.lock().unwrap_or_else(PoisonError::into_inner);

        if !slot.detector.check(index) {
            if let Some(cortex) = &slot.cortex {
                return Ok((cortex.clone(), true));
            }
        }

        slot.cortex = None;
        let cortex = Arc::new(LinkCortex::compile(index, &self.config)?);
        slot.cortex = Some(cortex.clone());
        Ok((cortex, false))
    }

    /// Compile-reuse rate as percentage
    pub fn cortex_reuse_rate(&self) -> f64 {
        self.compiled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .detector
            .skip_rate()
    }

    // -------------------------------------------------------------------------
    // Invalidation
    // -------------------------------------------------------------------------

    /// A vocabulary entry was created, updated or deleted. The entry's own
    /// page is a document too, so its linked HTML goes as well.
    pub fn on_vocabulary_saved(&self, id: &DocumentId) {
        tracing::debug!(entry = %id, "vocabulary entry saved, dropping term index");
        self.invalidate_term_index();
        self.document_cache.invalidate(id);
    }

    /// Drop the cached TermIndex; the next render rebuilds it
    pub fn invalidate_term_index(&self) {
        self.term_cache.invalidate();
    }

    /// A document was saved
    pub fn on_document_saved(&self, id: &DocumentId) {
        tracing::debug!(document = %id, "document saved, dropping linked html");
        self.document_cache.invalidate(id);
    }

    /// Wire both handlers into the host's save hooks
    pub fn register_hooks(self: &Arc<Self>, hooks: &mut SaveHooks) {
        let conductor = Arc::clone(self);
        hooks.on_vocabulary_saved(move |id| conductor.on_vocabulary_saved(id));
        let conductor = Arc::clone(self);
        hooks.on_document_saved(move |id| conductor.on_document_saved(id));
    }
}
