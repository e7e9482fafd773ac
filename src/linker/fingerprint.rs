//! Cache key fingerprints.
//!
//! Keys are stable across processes (they may live in a shared store), so
//! they use SHA-256 rather than the std hasher.

use sha2::{Digest, Sha256};

use crate::linker::config::LinkerConfig;
use crate::linker::types::DocumentId;

const TERM_KEY_PREFIX: &str = "dictionary_terms_";
const DOCUMENT_KEY_PREFIX: &str = "linked_content_";

fn digest(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(parts.join("_").as_bytes());
    hex::encode(hasher.finalize())
}

/// Site fingerprint: (site origin, plugin version, namespace)
pub fn site_fingerprint(config: &LinkerConfig) -> String {
    digest(&[
        &config.site_origin,
        &config.plugin_version,
        &config.cache_namespace,
    ])
}

/// Key of the Term Cache entry for this site and release
pub fn term_cache_key(config: &LinkerConfig) -> String {
    format!("{}{}", TERM_KEY_PREFIX, site_fingerprint(config))
}

/// Key of one document's linked HTML for this site and release
pub fn document_cache_key(config: &LinkerConfig, id: &DocumentId) -> String {
    let fingerprint = digest(&[
        id.as_str(),
        &config.site_origin,
        &config.plugin_version,
        &config.cache_namespace,
    ]);
    format!("{}{}", DOCUMENT_KEY_PREFIX, fingerprint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_deterministic() {
        let config = LinkerConfig::production("https://dict.example", "0.8.9");
        assert_eq!(term_cache_key(&config), term_cache_key(&config.clone()));
        assert!(term_cache_key(&config).starts_with("dictionary_terms_"));
        assert_eq!(term_cache_key(&config).len(), "dictionary_terms_".len() + 64);
    }

    #[test]
    fn test_version_changes_every_key() {
        let old = LinkerConfig::production("https://dict.example", "0.8.9");
        let new = LinkerConfig::production("https://dict.example", "0.9.0");
        let id = DocumentId::from(42u64);
        assert_ne!(term_cache_key(&old), term_cache_key(&new));
        assert_ne!(document_cache_key(&old, &id), document_cache_key(&new, &id));
    }

    #[test]
    fn test_site_and_document_scope_keys() {
        let a = LinkerConfig::production("https://a.example", "1.0.0");
        let b = LinkerConfig::production("https://b.example", "1.0.0");
        assert_ne!(site_fingerprint(&a), site_fingerprint(&b));
        assert_ne!(
            document_cache_key(&a, &DocumentId::from(1u64)),
            document_cache_key(&a, &DocumentId::from(2u64))
        );
    }
}
