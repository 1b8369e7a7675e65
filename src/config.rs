//! Tool configuration.
//!
//! Every operation takes its root paths from here; nothing is inferred from
//! the working directory of the call site.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{TapecutError, TapecutResult};

/// Configuration for the tapecut pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory the capture appliance writes raw recordings into
    pub capture_root: PathBuf,
    /// Directory per-tape footage and trimmed exports live under
    pub storage_root: PathBuf,
    /// Encoder executable
    pub ffmpeg_program: String,
    /// Stream-inspection executable
    pub ffprobe_program: String,
    /// Command invoked to deliver a request to the editor-automation
    /// collaborator; the request text is appended as the final argument
    pub editor_command: Vec<String>,
    /// Scene-change detection score threshold; lower is more sensitive
    pub cut_detection_threshold: f64,
    /// How long to wait for the collaborator's output file to appear
    pub handoff_timeout_ms: u64,
    /// Settle delay after the output file appears, before reading it
    pub handoff_settle_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capture_root: PathBuf::from("capture"),
            storage_root: PathBuf::from("storage"),
            ffmpeg_program: "ffmpeg".to_string(),
            ffprobe_program: "ffprobe".to_string(),
            editor_command: Vec::new(),
            cut_detection_threshold: 0.2,
            handoff_timeout_ms: 2000,
            handoff_settle_ms: 1000,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> TapecutResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&text).map_err(|e| TapecutError::Config {
            message: format!("{}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// The footage directory for one tape.
    pub fn tape_dir(&self, tape_id: &str) -> PathBuf {
        self.storage_root.join(tape_id)
    }

    fn validate(&self) -> TapecutResult<()> {
        if !(self.cut_detection_threshold > 0.0 && self.cut_detection_threshold < 1.0) {
            return Err(TapecutError::Config {
                message: format!(
                    "cut_detection_threshold must be in (0, 1), got {}",
                    self.cut_detection_threshold
                ),
            });
        }
        Ok(())
    }
}
