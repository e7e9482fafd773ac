//! Error types for the auto-linking pipeline.
//!
//! None of these reach a reader: the conductor swallows every variant and
//! falls back to the original content.

/// Result type alias using [`LinkerError`].
pub type Result<T> = std::result::Result<T, LinkerError>;

/// Errors raised inside the linking path.
#[derive(Debug, thiserror::Error)]
pub enum LinkerError {
    /// The entry store could not be read.
    #[error("Vocabulary source unavailable: {0}")]
    VocabularySourceUnavailable(String),

    /// The key-value backend failed a get/set/delete.
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// The headword automaton or a region pattern failed to compile.
    #[error("Pattern build failed: {0}")]
    PatternBuild(String),

    /// A cached payload could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LinkerError {
    /// Create a vocabulary source error.
    pub fn vocabulary(msg: impl Into<String>) -> Self {
        LinkerError::VocabularySourceUnavailable(msg.into())
    }

    /// Create a cache backend error.
    pub fn cache(msg: impl Into<String>) -> Self {
        LinkerError::CacheUnavailable(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        LinkerError::Config(msg.into())
    }
}
