//! Gridkeeper
//!
//! Admin console for users, permissions and organizational units.
//!
//! This is the command-line entry point.

use clap::Parser;
use gridkeeper_cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    gridkeeper_cli::run(cli).await
}
