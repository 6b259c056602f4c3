//! Tracing setup for the command-line tool.
//!
//! Logs go to stderr so stdout carries only results. `RUST_LOG` overrides
//! the default level.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Must be called at most once.
pub fn init(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,prisma_sbom={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {}", e))
}
