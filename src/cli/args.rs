//! Command-line argument definitions

use clap::Args;

/// Arguments for the cut command
#[derive(Args, Debug)]
pub struct CutArgs {
    /// Identifier for the tape the captured files belong to
    pub tape_id: String,
}

/// Arguments for the edit command
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Tape whose raw footage should be loaded into the editor
    pub tape_id: String,

    /// Detect scene cuts and attach marker frames to each clip
    #[arg(short = 'c', long)]
    pub detect_cuts: bool,

    /// Scene change detection score threshold; lower is more sensitive
    #[arg(short = 't', long)]
    pub threshold: Option<f64>,
}

/// Arguments for the trim command
#[derive(Args, Debug)]
pub struct TrimArgs {
    /// Copy video streams rather than re-encoding (faster and lossless, but
    /// pads out the start of each clip to the nearest keyframe)
    #[arg(short = 'c', long)]
    pub copy: bool,

    /// CRF for re-encodes, only used when --copy is not passed
    /// (lower is higher quality, larger files)
    #[arg(long, default_value = "10")]
    pub crf: u8,
}
