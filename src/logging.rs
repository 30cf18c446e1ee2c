//! Logging initialization for tck.
//!
//! Everything goes to stderr so stdout stays clean for listings.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Pick the filter directive: `--debug`, then `RUST_LOG`, then the config level
pub fn filter_directive(config: &Config, debug_override: bool) -> String {
    if debug_override {
        return "debug".to_string();
    }
    std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone())
}

/// Install the global subscriber. Call once, before any ticket operation.
pub fn init_logging(config: &Config, debug_override: bool) {
    let filter = tracing_subscriber::EnvFilter::new(filter_directive(config, debug_override));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}
