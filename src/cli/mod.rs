//! CLI module for tapecut
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// Tapecut VHS footage toolchain
///
/// Cuts raw capture files into per-tape directories, prepares editing
/// projects with detected scene cuts, and trims the edited timeline into
/// final clips with an external encoder.
#[derive(Parser)]
#[command(name = "tapecut")]
#[command(about = "Tapecut - VHS capture trimming and editing toolchain")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true, env = "TAPECUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Claim captured files for a tape and move them into storage
    Cut(args::CutArgs),
    /// Prepare an editing project for a tape, optionally detecting cuts
    Edit(args::EditArgs),
    /// Export the current timeline and trim its clips
    Trim(args::TrimArgs),
}
