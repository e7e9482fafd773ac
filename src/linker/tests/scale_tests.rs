//! Rendering against a full-size vocabulary
//!
//! 12,000 generated headwords, with accented and non-Latin letters and a
//! two-word phrase every fifth entry, linked into a ~14 KB accented document.

use std::sync::Arc;

use crate::linker::cache::MemoryCache;
use crate::linker::conductor::{LinkConductor, RenderSource};
use crate::linker::config::LinkerConfig;
use crate::linker::source::InMemoryVocabulary;
use crate::linker::types::{Document, EntryRecord};

const VOCABULARY_SIZE: usize = 12_000;
const SENTENCES: usize = 240;

/// Two-char syllables, so every five-syllable word is distinct
const SYLLABLES: [&str; 10] = ["ka", "lo", "mé", "ñu", "ta", "ri", "sɛ", "do", "ba", "fi"];

fn word(n: usize) -> String {
    format!("{:05}", n)
        .bytes()
        .map(|digit| SYLLABLES[(digit - b'0') as usize])
        .collect()
}

/// Every fifth headword is a phrase whose second word is itself a headword
fn headword(n: usize) -> String {
    if n % 5 == 0 {
        format!("{} {}", word(n), word(n + 1))
    } else {
        word(n)
    }
}

fn vocabulary() -> Vec<EntryRecord> {
    (0..VOCABULARY_SIZE)
        .map(|n| EntryRecord::new(n as u64 + 1, &headword(n), &format!("/dictionary/{}/", n)))
        .collect()
}

/// Picks spread across the vocabulary; every seventh is written in capitals
fn picks() -> Vec<(usize, String)> {
    (0..SENTENCES)
        .map(|k| {
            let n = (k * 4_999) % VOCABULARY_SIZE;
            let text = if k % 7 == 0 {
                headword(n).to_uppercase()
            } else {
                headword(n)
            };
            (n, text)
        })
        .collect()
}

fn document() -> String {
    let mut html = String::from("<h2>Ça été une journée à Ségou</h2>\n");
    for (k, (_, text)) in picks().into_iter().enumerate() {
        html.push_str(&format!(
            "<p>Élèves et maîtres ont parlé de « {} » près du fleuve, déjà {} fois.</p>\n",
            text, k
        ));
    }
    // Neither of these may link
    html.push_str(&format!("<a href=\"/elsewhere\">{}</a>\n", headword(1)));
    html.push_str(&format!("<p>{}x</p>\n", headword(2)));
    html
}

fn conductor() -> LinkConductor {
    let vocabulary = Arc::new(InMemoryVocabulary::new(vocabulary()));
    LinkConductor::new(
        LinkerConfig::production("https://dict.example", "0.8.9"),
        Arc::new(MemoryCache::new()),
        vocabulary.clone(),
        vocabulary,
    )
    .unwrap()
}

#[test]
fn test_generated_headwords_are_distinct() {
    assert_eq!(word(12), "kakakalomé");
    assert_eq!(headword(10), "kakakaloka kakakalolo");
    let all: std::collections::HashSet<String> = (0..VOCABULARY_SIZE).map(headword).collect();
    assert_eq!(all.len(), VOCABULARY_SIZE);
}

#[test]
fn test_full_vocabulary_render() {
    let conductor = conductor();
    let content = document();
    assert!(content.len() > 10_000);

    let outcome = conductor.render_with_stats(&Document::new(900_000u64, "post", &content));
    let stats = &outcome.stats;

    assert_eq!(stats.source, RenderSource::Linked);
    assert_eq!(stats.term_count, VOCABULARY_SIZE);
    assert_eq!(stats.link.links_inserted, SENTENCES);
    assert_eq!(stats.link.protected_regions, 2);
    assert_eq!(stats.link.unlinked_matches, 0);

    for (n, text) in picks() {
        let anchor = format!(
            r#"<a href="/dictionary/{}/" class="aiwa-dictionary-link" title="{}" data-word="{}">{}</a>"#,
            n,
            headword(n),
            headword(n),
            text
        );
        assert!(outcome.html.contains(&anchor), "missing link for headword {}", n);
    }

    assert!(outcome.html.contains("<h2>Ça été une journée à Ségou</h2>"));
    assert!(outcome.html.contains(&format!("<a href=\"/elsewhere\">{}</a>", headword(1))));
    assert!(outcome.html.contains(&format!("<p>{}x</p>", headword(2))));

    // Loose bound: a debug build still links a post this size in well under this
    assert!(
        stats.link.elapsed_us < 2_000_000,
        "link pass took {}us",
        stats.link.elapsed_us
    );
}

#[test]
fn test_phrase_beats_its_second_word() {
    // word(11) is a headword of its own but sits inside the phrase for 10
    let conductor = conductor();
    let content = format!("Avant {} après, puis {} seul.", headword(10), word(11));
    let out = conductor.render_linked_content(&Document::new(900_001u64, "post", &content));
    assert!(out.contains(&format!(r#"data-word="{}">{}</a> après"#, headword(10), headword(10))));
    assert!(out.contains(r#"href="/dictionary/11/""#));
    assert_eq!(out.matches("<a ").count(), 2);
}
