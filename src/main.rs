//! Tapecut CLI
//!
//! A command-line toolchain for a home VHS capture and editing workflow.
//!
//! # Usage
//!
//! ```bash
//! tapecut cut tape42
//! tapecut edit tape42 --detect-cuts
//! tapecut trim --copy
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use tapecut::cli::{commands, Cli, Commands};
use tapecut::config::Config;

/// Main entry point for the tapecut CLI
fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    // Execute the requested command
    match cli.command {
        Commands::Cut(args) => {
            info!("Executing cut command");
            commands::cut(&config, args)?;
        }
        Commands::Edit(args) => {
            info!("Executing edit command");
            commands::edit(&config, args)?;
        }
        Commands::Trim(args) => {
            info!("Executing trim command");
            commands::trim(&config, args)?;
        }
    }

    Ok(())
}
