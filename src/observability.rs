//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence over the configured `log_level`. Production
//! emits one JSON object per line; everything else gets human-readable text.

use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_tracing(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = env_filter(config);

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    }
}

fn env_filter(config: &ServerConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
