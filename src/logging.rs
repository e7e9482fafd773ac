//! Tracing subscriber setup
//!
//! In the browser events go to the devtools console through `tracing-wasm`;
//! native builds format them to stderr. The level sits behind a reload
//! handle so `setLogLevel` can change it after start-up. Hosts that install
//! their own subscriber simply never call [`init_logging`].

use std::sync::OnceLock;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, Registry};

static LEVEL: OnceLock<reload::Handle<LevelFilter, Registry>> = OnceLock::new();

/// Install the global subscriber at `level`. Later calls only adjust the
/// level; if another subscriber is already installed it is left in place.
pub fn init_logging(level: LevelFilter) {
    if let Some(handle) = LEVEL.get() {
        if let Err(e) = handle.modify(|filter| *filter = level) {
            tracing::warn!(error = %e, "could not change log level");
        }
        return;
    }

    let (filter, handle) = reload::Layer::new(level);
    let registry = tracing_subscriber::registry().with(filter);

    #[cfg(target_arch = "wasm32")]
    let subscriber = registry.with(tracing_wasm::WASMLayer::default());

    #[cfg(not(target_arch = "wasm32"))]
    let subscriber = registry.with(
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr),
    );

    match tracing::subscriber::set_global_default(subscriber) {
        Ok(()) => {
            let _ = LEVEL.set(handle);
        }
        Err(e) => tracing::debug!(error = %e, "subscriber already installed"),
    }
}

/// Parse a level name ("warn", "debug", ...), defaulting to `WARN`
pub fn parse_level(name: &str) -> LevelFilter {
    name.parse().unwrap_or(LevelFilter::WARN)
}
