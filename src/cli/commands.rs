//! Command implementations

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::args::{CutArgs, EditArgs, TrimArgs};
use crate::config::Config;
use crate::editor::{build_project, export_timeline, CommandChannel};
use crate::engine::{run_batch, TrimMode};
use crate::ingest::{collect_input_videos, cut_recording};

/// Execute the cut command
pub fn cut(config: &Config, args: CutArgs) -> Result<()> {
    let summary = cut_recording(config, &args.tape_id)
        .with_context(|| format!("Failed to cut recording for tape {}", args.tape_id))?;
    info!(
        "Tape {} now has {} raw files in {}",
        args.tape_id,
        summary.file_count,
        summary.tape_dir.display()
    );
    Ok(())
}

/// Execute the edit command
pub fn edit(config: &Config, args: EditArgs) -> Result<()> {
    let threshold = args.threshold.unwrap_or(config.cut_detection_threshold);
    let videos = collect_input_videos(config, &args.tape_id, args.detect_cuts, threshold)
        .with_context(|| format!("Failed to collect footage for tape {}", args.tape_id))?;

    info!(
        "Building editing project for tape {} from {} raw files",
        args.tape_id,
        videos.len()
    );
    let channel = CommandChannel::from_config(config)?;
    build_project(&channel, &args.tape_id, &videos).context("Failed to build editing project")?;
    Ok(())
}

/// Execute the trim command
pub fn trim(config: &Config, args: TrimArgs) -> Result<()> {
    let channel = CommandChannel::from_config(config)?;
    let export = export_timeline(&channel, config).context("Failed to export timeline")?;

    let mode = if args.copy {
        TrimMode::Copy
    } else {
        TrimMode::Reencode { crf: args.crf }
    };
    run_batch(config, &export, mode)
        .with_context(|| format!("Failed to trim clips for tape {}", export.name))?;

    info!("Trimmed {} clips for tape {}", export.clips.len(), export.name);
    Ok(())
}
