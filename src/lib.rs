//! Tapecut Library
//!
//! Core pipeline for a VHS capture and editing workflow: exact decimal time
//! arithmetic across NTSC frame-rate conventions, scene-cut detection from an
//! external encoder's diagnostic stream, keyframe-snapped stream-copy
//! trimming, and the interchange seam to an editor-automation collaborator.

pub mod cli;
pub mod config;
pub mod detect;
pub mod editor;
pub mod engine;
pub mod error;
pub mod exec;
pub mod frames;
pub mod ingest;
pub mod interchange;
pub mod probe;
pub mod time;

// Re-export commonly used types
pub use config::Config;
pub use error::{TapecutError, TapecutResult};
pub use interchange::{ClipDescriptor, InputVideoFile, TimelineExport};
pub use probe::KeyframeIndex;
pub use time::{FrameRate, Rational, Timestamp};
