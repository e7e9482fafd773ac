//! Configuration types and defaults for the auto-linker

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::linker::error::{LinkerError, Result};

/// Seven days, the lifetime of the cached vocabulary snapshot
pub const DEFAULT_TERM_CACHE_TTL_SECS: u64 = 604_800;

/// Headwords of this many characters or fewer are never linked ("The", "And")
pub const DEFAULT_MIN_HEADWORD_CHARS: usize = 3;

// =============================================================================
// Main Configuration
// =============================================================================

/// Auto-linker configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LinkerConfig {
    /// Site origin, part of every cache fingerprint. Default: "http://localhost"
    pub site_origin: String,
    /// Plugin version, part of every cache fingerprint. Default: crate version
    pub plugin_version: String,
    /// Namespace mixed into cache keys. Default: "glosslink_dictionary"
    pub cache_namespace: String,
    /// Term Cache lifetime in seconds. Default: 604800 (7 days)
    pub term_cache_ttl_secs: u64,
    /// Document Cache lifetime in seconds, 0 = until explicitly invalidated. Default: 0
    pub document_cache_ttl_secs: u64,
    /// Headwords must be longer than this many characters. Default: 3
    pub min_headword_chars: usize,
    /// CSS class on generated anchors. Default: "aiwa-dictionary-link"
    pub link_class: String,
    /// Prefix for the generated title attribute. Default: ""
    pub title_prefix: String,
    /// Document kinds the conductor links. Default: post, page, dictionary
    pub linkable_kinds: Vec<String>,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            site_origin: "http://localhost".to_string(),
            plugin_version: env!("CARGO_PKG_VERSION").to_string(),
            cache_namespace: "glosslink_dictionary".to_string(),
            term_cache_ttl_secs: DEFAULT_TERM_CACHE_TTL_SECS,
            document_cache_ttl_secs: 0,
            min_headword_chars: DEFAULT_MIN_HEADWORD_CHARS,
            link_class: "aiwa-dictionary-link".to_string(),
            title_prefix: String::new(),
            linkable_kinds: vec![
                "post".to_string(),
                "page".to_string(),
                "dictionary".to_string(),
            ],
        }
    }
}

impl LinkerConfig {
    /// Production configuration for a given site and release
    pub fn production(site_origin: &str, plugin_version: &str) -> Self {
        Self {
            site_origin: site_origin.to_string(),
            plugin_version: plugin_version.to_string(),
            ..Self::default()
        }
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.plugin_version.trim().is_empty() {
            return Err(LinkerError::config("plugin_version must not be empty"));
        }
        Ok(())
    }

    pub fn term_cache_ttl(&self) -> Option<Duration> {
        ttl_from_secs(self.term_cache_ttl_secs)
    }

    pub fn document_cache_ttl(&self) -> Option<Duration> {
        ttl_from_secs(self.document_cache_ttl_secs)
    }

    /// Whether documents of this kind get linked at all
    pub fn is_linkable_kind(&self, kind: &str) -> bool {
        self.linkable_kinds.iter().any(|k| k == kind)
    }
}

/// 0 means "keep until invalidated", as with transients
fn ttl_from_secs(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}
