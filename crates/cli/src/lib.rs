//! # Gridkeeper CLI
//!
//! Command-line interface for Gridkeeper.
//!
//! Drives the same grid controllers as the console against a live backend,
//! with the console widgets replaced by headless ones whose state is printed.
//!
//! ## Commands
//!
//! - `entities` - List the managed entity types
//! - `list` - Show the grid of an entity type
//! - `create` / `update` - Submit the add or edit form
//! - `delete` - Delete a row
//! - `related` - Show the records related to a row
//!

pub mod commands;
pub mod config;
pub mod render;

pub use commands::{Cli, Command, FormArgs};
pub use config::ConsoleConfig;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the `tracing` subscriber
///
/// `RUST_LOG` wins over the configured level. Logs go to stderr so command
/// output stays clean.
pub fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run a parsed command line
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.load_config()?;
    init_logging(&config.logging.level);
    tracing::debug!("Gridkeeper CLI {}", VERSION);
    commands::execute(cli.command, config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
