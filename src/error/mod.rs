//! Error handling module for tapecut

use thiserror::Error;

/// Main error type for tapecut operations
#[derive(Error, Debug)]
pub enum TapecutError {
    /// Input file not found or inaccessible
    #[error("Input file not found: {path}")]
    InputFileNotFound { path: String },

    /// Invalid editor timecode
    #[error("Invalid timecode: {timecode}. Expected HH:MM:SS:FF with two-digit fields")]
    InvalidTimecode { timecode: String },

    /// Invalid encoder timestamp
    #[error("Invalid timestamp: {timestamp}. Expected HH:MM:SS.ff with two-digit fields")]
    InvalidTimestamp { timestamp: String },

    /// Invalid decimal seconds value
    #[error("Invalid decimal seconds value: {value}")]
    InvalidDecimal { value: String },

    /// Destination tape directory already exists
    #[error("Cannot cut new recording to {path}: directory already exists")]
    TapeDirExists { path: String },

    /// No capture files available for ingest
    #[error("No input files in {path}: unable to cut a new recording")]
    NoCaptureFiles { path: String },

    /// No raw footage found for a tape
    #[error("No raw footage for tape {tape_id} under {path}")]
    NoRawFootage { tape_id: String, path: String },

    /// Clip out-point does not follow its in-point
    #[error("Invalid clip range: out point {out_point} is not after in point {in_point}")]
    InvalidClipRange { in_point: String, out_point: String },

    /// External process could not be launched
    #[error("Failed to spawn {program}: {source}")]
    ProcessSpawn {
        program: String,
        source: std::io::Error,
    },

    /// External process exited with a non-zero status
    #[error("{program} returned exit code {code}")]
    ProcessFailed { program: String, code: i32 },

    /// Internal-consistency violation in the encoder output stream
    #[error("Encoder stream contract violated: {message}")]
    StreamContract { message: String },

    /// Keyframe lookup against an index with no entries
    #[error("Keyframe index for {path} is empty")]
    EmptyKeyframeIndex { path: String },

    /// No keyframe exists at or before the requested time
    #[error("No keyframe at or before {seconds}s in {path}")]
    NoKeyframeBefore { path: String, seconds: String },

    /// Timed out waiting for a collaborator-produced file
    #[error("Timed out after {waited_ms}ms waiting for {path}")]
    Timeout { path: String, waited_ms: u64 },

    /// Malformed interchange data
    #[error("Invalid timeline export: {0}")]
    InvalidInterchange(#[from] serde_json::Error),

    /// Configuration file error
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for tapecut operations
pub type TapecutResult<T> = std::result::Result<T, TapecutError>;
