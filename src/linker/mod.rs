pub mod cache;
pub mod change;
pub mod conductor;
pub mod config;
pub mod cortex;
pub mod document_cache;
pub mod error;
pub mod escape;
pub mod fingerprint;
pub mod hooks;
pub mod index;
pub mod source;
pub mod term_cache;
pub mod types;

pub use cache::*;
pub use change::*;
pub use conductor::*;
pub use config::*;
pub use cortex::*;
pub use document_cache::*;
pub use error::LinkerError;
pub use hooks::*;
pub use index::*;
pub use source::*;
pub use term_cache::*;
pub use types::*;

#[cfg(test)]
mod tests;
