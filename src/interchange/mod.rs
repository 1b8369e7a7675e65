//! JSON interchange with the editor-automation collaborator.
//!
//! Two payloads cross the boundary: the timeline export the collaborator
//! writes for us to trim, and the input-video list we hand to the
//! project builder. Both fail fast on missing or wrong-typed fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TapecutResult;

/// One clip exported from the editing timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipDescriptor {
    /// Source media file the clip was cut from
    pub src_filepath: String,
    /// Filename for the trimmed output
    pub dst_filename: String,
    /// Clip in-point, `HH:MM:SS:FF` in the editor's nominal-rate convention
    pub in_timecode: String,
    /// Clip out-point, same convention
    pub out_timecode: String,
}

/// The timeline export written by the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineExport {
    /// Payload discriminator
    #[serde(rename = "type")]
    pub kind: String,
    /// Payload schema version
    pub version: u32,
    /// Tape identifier; trimmed clips land under storage/<name>
    pub name: String,
    /// Clips in timeline order, top to bottom on the single video track
    pub clips: Vec<ClipDescriptor>,
}

impl TimelineExport {
    /// Read and validate a timeline export from a JSON file.
    pub fn from_json_file(path: &Path) -> TapecutResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let export: TimelineExport = serde_json::from_str(&text)?;
        Ok(export)
    }
}

/// One raw capture file plus its detected cut frames, handed to the
/// project-builder collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputVideoFile {
    /// Absolute path to the raw footage file
    pub path: String,
    /// Frame indices of detected cuts, sorted ascending, deduplicated
    pub cut_frames: Vec<u64>,
}
