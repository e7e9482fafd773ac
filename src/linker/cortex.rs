//! LinkCortex: rewrites dictionary headwords in HTML into anchors
//!
//! Two compiled matchers, one pass over the content. Five branches, tried
//! left to right at every position:
//! 1. `<a ...>...</a>`        (existing links, passed through)
//! 2. `<h1..h6 ...>...</hN>`  (headings, passed through)
//! 3. `<script ...>...</script>`
//! 4. `<style ...>...</style>`
//! 5. a headword bounded by non-letters (linked)
//!
//! Branches 1-4 are one small regex. Branch 5 is an Aho-Corasick automaton
//! over the lowercased headwords, run once over a lowercased copy of the
//! content; a vocabulary of ~12k headwords as a regex alternation leaves the
//! regex crate on its slowest engine. The automaton reports every headword
//! ending at every offset, so when the longest headword starting at a
//! position fails its trailing boundary the next longest one is tried, the
//! same outcome as an ordered alternation.
//!
//! Boundaries are `\p{L}`: a headword may not be preceded or followed by a
//! letter. Region detection is regex based: an unterminated `<a>` or `<h2>`
//! simply does not match, and the text after it may get linked.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::sync::OnceLock;

use crate::linker::config::LinkerConfig;
use crate::linker::error::{LinkerError, Result};
use crate::linker::escape::{escape_attr, sanitize_url};
use crate::linker::index::TermIndex;
use crate::linker::source::UrlResolver;
use crate::linker::types::DocumentId;

// Tag names are ASCII, so an ASCII word boundary is enough and keeps the
// regex on its DFA for non-ASCII text.
const PROTECTED_REGIONS: &str = concat!(
    r"(?is)<a(?-u:\b)[^>]*>.*?</a>",
    r"|<h[1-6](?-u:\b)[^>]*>.*?</h[1-6]>",
    r"|<script(?-u:\b)[^>]*>.*?</script>",
    r"|<style(?-u:\b)[^>]*>.*?</style>",
);

/// `\p{L}`. `char::is_alphabetic` is the wider Alphabetic property, which
/// also admits letter numbers and combining vowel signs.
const LETTER_CLASS: &str = r"\p{L}";

static PROTECTED: OnceLock<Regex> = OnceLock::new();
static LETTER: OnceLock<Regex> = OnceLock::new();

fn shared_regex(slot: &'static OnceLock<Regex>, pattern: &str) -> Result<&'static Regex> {
    if let Some(re) = slot.get() {
        return Ok(re);
    }
    let re = Regex::new(pattern).map_err(|e| LinkerError::PatternBuild(e.to_string()))?;
    Ok(slot.get_or_init(|| re))
}

// =============================================================================
// Types
// =============================================================================

/// Counters for one link pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStats {
    pub links_inserted: usize,
    pub self_references_skipped: usize,
    pub protected_regions: usize,
    /// Matches whose target URL is not linkable
    pub unlinked_matches: usize,
    pub elapsed_us: u64,
}

/// Result of a link pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkOutcome {
    pub html: String,
    pub stats: LinkStats,
}

/// A headword prepared for rendering
#[derive(Debug, Clone)]
struct CompiledTerm {
    target_url: String,
    /// Sanitised href, `None` if the URL is not linkable
    href: Option<String>,
    title_attr: String,
    word_attr: String,
}

/// A headword occurrence with a valid leading boundary, in source offsets
#[derive(Debug, Clone, Copy)]
struct Candidate {
    start: usize,
    end: usize,
    slot: usize,
}

/// Lowercased copy of a text that maps back to source offsets
struct Folded {
    text: String,
    /// Per byte of `text`: the source offset of the char whose lowering
    /// starts at that byte
    origin: Vec<Option<usize>>,
    source_len: usize,
}

impl Folded {
    fn new(source: &str) -> Self {
        let mut text = String::with_capacity(source.len());
        let mut origin = Vec::with_capacity(source.len());
        for (offset, c) in source.char_indices() {
            origin.push(Some(offset));
            text.extend(c.to_lowercase());
            origin.resize(text.len(), None);
        }
        Self {
            text,
            origin,
            source_len: source.len(),
        }
    }

    /// Source offset for a folded offset, `None` inside a multi-char lowering
    fn source_offset(&self, at: usize) -> Option<usize> {
        if at == self.text.len() {
            Some(self.source_len)
        } else {
            self.origin.get(at).copied().flatten()
        }
    }
}

/// Lowercase char by char, the same way [`Folded`] lowers content
fn fold(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

// =============================================================================
// LinkCortex
// =============================================================================

/// Compiled matcher for one [`TermIndex`]
#[derive(Debug, Clone)]
pub struct LinkCortex {
    /// `None` when the index has no headwords
    automaton: Option<AhoCorasick>,
    protected: &'static Regex,
    letter: &'static Regex,
    /// Pattern id → term. Headwords that lowercase alike share the slot of
    /// the first one in index order.
    terms: Vec<CompiledTerm>,
    class_attr: String,
}

impl LinkCortex {
    /// Compile with default anchor styling
    pub fn new(index: &TermIndex) -> Result<Self> {
        Self::compile(index, &LinkerConfig::default())
    }

    pub fn compile(index: &TermIndex, config: &LinkerConfig) -> Result<Self> {
        let protected = shared_regex(&PROTECTED, PROTECTED_REGIONS)?;
        let letter = shared_regex(&LETTER, LETTER_CLASS)?;

        let mut terms = Vec::with_capacity(index.len());
        let mut patterns = Vec::with_capacity(index.len());
        let mut seen = HashSet::with_capacity(index.len());

        for entry in index.entries() {
            let folded = fold(&entry.headword);
            if folded.is_empty() || !seen.insert(folded.clone()) {
                continue;
            }
            patterns.push(folded);
            terms.push(CompiledTerm {
                target_url: entry.target_url.clone(),
                href: sanitize_url(&entry.target_url),
                title_attr: escape_attr(&format!("{}{}", config.title_prefix, entry.headword)),
                word_attr: escape_attr(&entry.headword),
            });
        }

        // Standard semantics: overlapping search needs it, and shorter
        // fallbacks at the same start are chosen in `link_with_stats`
        let automaton = if patterns.is_empty() {
            None
        } else {
            let automaton = AhoCorasickBuilder::new()
                .match_kind(MatchKind::Standard)
                .build(&patterns)
                .map_err(|e| LinkerError::PatternBuild(e.to_string()))?;
            Some(automaton)
        };

        tracing::debug!(headwords = terms.len(), "link cortex compiled");

        Ok(Self {
            automaton,
            protected,
            letter,
            terms,
            class_attr: escape_attr(&config.link_class),
        })
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Link every eligible headword occurrence in `content`
    pub fn link(&self, content: &str, resolver: &dyn UrlResolver, current: &DocumentId) -> String {
        self.link_with_stats(content, resolver, current).html
    }

    pub fn link_with_stats(
        &self,
        content: &str,
        resolver: &dyn UrlResolver,
        current: &DocumentId,
    ) -> LinkOutcome {
        let started = instant::Instant::now();
        let mut stats = LinkStats::default();

        let automaton = match &self.automaton {
            Some(a) if !content.is_empty() => a,
            _ => {
                return LinkOutcome {
                    html: content.to_string(),
                    stats,
                }
            }
        };

        let protected: Vec<Range<usize>> = self.protected.find_iter(content).map(|m| m.range()).collect();
        stats.protected_regions = protected.len();
        let candidates = self.candidates(automaton, content);

        let mut out = String::with_capacity(content.len() + content.len() / 4);
        // Whether a slot's target is the current document, resolved once per pass
        let mut self_ref: HashMap<usize, bool> = HashMap::new();
        let mut spans = protected.iter().peekable();
        let mut emitted = 0;
        let mut rest = candidates.as_slice();

        while let Some(first) = rest.first() {
            let start = first.start;
            let width = rest.iter().take_while(|c| c.start == start).count();
            let (group, tail) = rest.split_at(width);
            rest = tail;

            // Inside the previous link (its consumed text)
            if start < emitted {
                continue;
            }
            while spans.next_if(|span| span.end <= start).is_some() {}
            let limit = match spans.peek() {
                Some(span) if span.start <= start => continue,
                Some(span) => span.start,
                None => content.len(),
            };

            // Longest first; a headword may not run into a protected region
            let Some(hit) = group
                .iter()
                .find(|c| c.end <= limit && !self.letter_at(content, c.end))
            else {
                continue;
            };

            let matched = &content[hit.start..hit.end];
            out.push_str(&content[emitted..hit.start]);
            emitted = hit.end;

            let term = &self.terms[hit.slot];
            let is_self = *self_ref.entry(hit.slot).or_insert_with(|| {
                resolver.resolve_document_id(&term.target_url).as_ref() == Some(current)
            });
            if is_self {
                stats.self_references_skipped += 1;
                out.push_str(matched);
                continue;
            }

            match &term.href {
                Some(href) => {
                    stats.links_inserted += 1;
                    out.push_str(&format!(
                        r#"<a href="{}" class="{}" title="{}" data-word="{}">{}</a>"#,
                        href, self.class_attr, term.title_attr, term.word_attr, matched
                    ));
                }
                None => {
                    stats.unlinked_matches += 1;
                    out.push_str(matched);
                }
            }
        }

        out.push_str(&content[emitted..]);
        stats.elapsed_us = started.elapsed().as_micros() as u64;
        LinkOutcome { html: out, stats }
    }

    /// Every headword occurrence not preceded by a letter, ordered by start
    /// and then by index order (longest first)
    fn candidates(&self, automaton: &AhoCorasick, content: &str) -> Vec<Candidate> {
        let folded = Folded::new(content);
        let mut found: Vec<Candidate> = automaton
            .find_overlapping_iter(folded.text.as_str())
            .filter_map(|m| {
                let start = folded.source_offset(m.start())?;
                let end = folded.source_offset(m.end())?;
                (!self.letter_before(content, start)).then_some(Candidate {
                    start,
                    end,
                    slot: m.pattern().as_usize(),
                })
            })
            .collect();
        found.sort_unstable_by_key(|c| (c.start, c.slot));
        found
    }

    fn letter_before(&self, content: &str, at: usize) -> bool {
        content[..at]
            .chars()
            .next_back()
            .is_some_and(|c| self.is_letter(&content[at - c.len_utf8()..at]))
    }

    fn letter_at(&self, content: &str, at: usize) -> bool {
        content[at..]
            .chars()
            .next()
            .is_some_and(|c| self.is_letter(&content[at..at + c.len_utf8()]))
    }

    /// `ch` is exactly one char
    fn is_letter(&self, ch: &str) -> bool {
        match ch.as_bytes() {
            [byte] => byte.is_ascii_alphabetic(),
            _ => self.letter.is_match(ch),
        }
    }
}

/// Compile and run in one go, returning `content` unchanged if the matcher
/// cannot be built.
pub fn link(
    content: &str,
    terms: &TermIndex,
    resolver: &dyn UrlResolver,
    current: &DocumentId,
) -> String {
    match LinkCortex::new(terms) {
        Ok(cortex) => cortex.link(content, resolver, current),
        Err(e) => {
            tracing::warn!(error = %e, "content left unlinked");
            content.to_string()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
