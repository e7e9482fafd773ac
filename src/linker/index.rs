//! TermIndex: the vocabulary snapshot the link cortex compiles from
//!
//! Terms are ordered by descending headword length so that the alternation
//! built from them tries "Hospitality Management" before "Hospitality".
//! Alternation in the regex crate is leftmost-first, so this ordering is what
//! makes the longest headword win at a given position.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::linker::config::DEFAULT_MIN_HEADWORD_CHARS;
use crate::linker::error::Result;
use crate::linker::source::VocabularySource;
use crate::linker::types::EntryRecord;

// =============================================================================
// Types
// =============================================================================

/// One headword and the URL it links to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermEntry {
    pub headword: String,
    pub target_url: String,
}

/// Ordered headword → URL mapping, longest headword first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermIndex {
    entries: Vec<TermEntry>,
    pub built_at: DateTime<Utc>,
}

impl Default for TermIndex {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for TermIndex {
    // Snapshots with the same terms are the same index, whenever they were built
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl TermIndex {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            built_at: Utc::now(),
        }
    }

    /// Build from (headword, url) pairs, applying the stable length sort.
    /// No filtering or dedupe happens here; see [`TermIndexBuilder`].
    pub fn from_pairs<I, H, U>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (H, U)>,
        H: Into<String>,
        U: Into<String>,
    {
        let mut entries: Vec<TermEntry> = pairs
            .into_iter()
            .map(|(h, u)| TermEntry {
                headword: h.into(),
                target_url: u.into(),
            })
            .collect();
        sort_longest_first(&mut entries);
        Self {
            entries,
            built_at: Utc::now(),
        }
    }

    pub fn entries(&self) -> &[TermEntry] {
        &self.entries
    }

    pub fn headwords(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.headword.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Stable sort by descending character count; ties keep iteration order
fn sort_longest_first(entries: &mut [TermEntry]) {
    entries.sort_by_cached_key(|e| std::cmp::Reverse(e.headword.chars().count()));
}

// =============================================================================
// TermIndexBuilder
// =============================================================================

/// Builds a [`TermIndex`] from the published vocabulary
#[derive(Debug, Clone)]
pub struct TermIndexBuilder {
    min_headword_chars: usize,
}

impl Default for TermIndexBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_HEADWORD_CHARS)
    }
}

impl TermIndexBuilder {
    /// Headwords with `min_headword_chars` characters or fewer are dropped
    pub fn new(min_headword_chars: usize) -> Self {
        Self { min_headword_chars }
    }

    /// Build, failing soft: an unreachable store yields an empty index
    pub fn build(&self, source: &dyn VocabularySource) -> TermIndex {
        match self.try_build(source) {
            Ok(index) => index,
            Err(e) => {
                tracing::warn!(error = %e, "vocabulary unavailable, continuing with an empty index");
                TermIndex::empty()
            }
        }
    }

    pub fn try_build(&self, source: &dyn VocabularySource) -> Result<TermIndex> {
        let records = source.list_published_entries()?;
        let index = self.build_from_records(records);
        tracing::debug!(terms = index.len(), "term index built");
        Ok(index)
    }

    /// Filter, dedupe and order a batch of entry records.
    ///
    /// A repeated headword keeps the slot of its first occurrence but takes
    /// the URL of its last one.
    pub fn build_from_records<I>(&self, records: I) -> TermIndex
    where
        I: IntoIterator<Item = EntryRecord>,
    {
        let mut entries: Vec<TermEntry> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();

        for record in records {
            if record.title.chars().count() <= self.min_headword_chars {
                continue;
            }
            if record.permalink.trim().is_empty() {
                tracing::debug!(headword = %record.title, "skipping entry without permalink");
                continue;
            }
            match slots.get(&record.title) {
                Some(&slot) => {
                    tracing::debug!(headword = %record.title, "duplicate headword");
                    entries[slot].target_url = record.permalink;
                }
                None => {
                    slots.insert(record.title.clone(), entries.len());
                    entries.push(TermEntry {
                        headword: record.title,
                        target_url: record.permalink,
                    });
                }
            }
        }

        sort_longest_first(&mut entries);
        TermIndex {
            entries,
            built_at: Utc::now(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
