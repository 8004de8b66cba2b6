//! Console tracing for the meteohidro binary
//!
//! Usage:
//!   meteohidro --debug serve            # Debug logging to console
//!   RUST_LOG=meteohidro_server=debug    # Fine-grained log control
//!
//! `RUST_LOG` always wins over `--debug`.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingConfig {
    /// Debug logging when RUST_LOG is unset
    pub debug: bool,
}

/// Filter directives used when RUST_LOG is unset.
fn default_directives(config: &TracingConfig) -> &'static str {
    if config.debug {
        "debug"
    } else {
        "info,tower_http=debug"
    }
}

fn env_filter(config: &TracingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config)))
}

/// Install the global fmt subscriber. Fails if one is already set.
pub fn init(config: &TracingConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(config.debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
