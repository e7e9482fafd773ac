//! GlossLink: Dictionary Auto-Linking Engine
//!
//! Rewrites rendered post HTML so that every occurrence of a dictionary
//! headword links to its entry.
//!
//! # Architecture
//!
//! ## Linking
//! - `index.rs` - TermIndex + TermIndexBuilder: vocabulary snapshot, longest headword first
//! - `cortex.rs` - LinkCortex: single-pass linker, headword automaton + protected-region regex
//! - `escape.rs` - Attribute escaping and href sanitising
//!
//! ## Caching
//! - `cache.rs` - KeyValueCache trait + MemoryCache
//! - `term_cache.rs` - TermCache: TermIndex by site fingerprint
//! - `document_cache.rs` - DocumentCache: linked HTML per document
//! - `fingerprint.rs` - SHA-256 cache keys (site origin, plugin version)
//! - `change.rs` - ChangeDetector: reuse the compiled cortex while terms are unchanged
//!
//! ## Orchestration
//! - `conductor.rs` - LinkConductor: render coordinator, fail-open
//! - `hooks.rs` - SaveHooks: invalidation on vocabulary/document saves
//! - `source.rs` - VocabularySource / UrlResolver + InMemoryVocabulary
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { AutoLinker } from 'glosslink';
//!
//! await init();
//!
//! const linker = new AutoLinker({ site_origin: 'https://dict.example', plugin_version: '0.8.9' });
//! linker.hydrateEntries([
//!   { id: '12', title: 'Hospitality', permalink: '/dictionary/hospitality/' }
//! ]);
//!
//! const html = linker.render('40', 'post', '<p>Hospitality matters.</p>');
//! linker.documentSaved('40');   // drops the cached html for post 40
//! ```

pub mod linker;
pub mod logging;
pub mod wasm;

// Public exports
pub use linker::*;
pub use logging::init_logging;
pub use wasm::AutoLinker;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    init_logging(tracing::level_filters::LevelFilter::WARN);
}

/// Set the console log level ("error", "warn", "info", "debug", "trace")
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) {
    init_logging(logging::parse_level(level));
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("glosslink v{}", env!("CARGO_PKG_VERSION"))
}
