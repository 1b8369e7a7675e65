//! Trim engine: turns timeline clips into trimmed output files.
//!
//! One mode is selected for a whole batch. Copy mode stream-copies every
//! stream with the in-point snapped back to a keyframe; re-encode mode cuts
//! at exact boundaries and re-encodes video while copying audio. Clips are
//! processed sequentially in export order, and the first failure aborts the
//! batch.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::info;

use crate::config::Config;
use crate::error::{TapecutError, TapecutResult};
use crate::interchange::TimelineExport;
use crate::probe::KeyframeIndex;
use crate::time::{Rational, Timestamp};

pub mod copy;
pub mod reencode;

/// Bound-computation and invocation strategy, fixed per batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimMode {
    /// Stream-copy all streams, in-point snapped to the preceding keyframe
    Copy,
    /// Re-encode video at the given CRF at exact boundaries, copy audio
    Reencode { crf: u8 },
}

/// Computed trim boundaries for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimBounds {
    /// Seek offset into the source
    pub start: Timestamp,
    /// Output duration in seconds
    pub duration: Rational,
}

/// Trim every clip of a timeline export into the tape's storage directory.
pub fn run_batch(config: &Config, export: &TimelineExport, mode: TrimMode) -> TapecutResult<()> {
    let dst_dir = config.tape_dir(&export.name);
    std::fs::create_dir_all(&dst_dir)?;

    // Copy mode needs a keyframe index per distinct source file, built once
    // up front before any clip is touched.
    let mut indexes: BTreeMap<String, KeyframeIndex> = BTreeMap::new();
    if mode == TrimMode::Copy {
        let sources: BTreeSet<&String> = export.clips.iter().map(|c| &c.src_filepath).collect();
        for src in sources {
            let index = KeyframeIndex::probe(config, Path::new(src))?;
            indexes.insert(src.clone(), index);
        }
    }

    info!(
        "Trimming {} clips for tape {} into {}",
        export.clips.len(),
        export.name,
        dst_dir.display()
    );
    for clip in &export.clips {
        let src = Path::new(&clip.src_filepath);
        if !src.is_file() {
            return Err(TapecutError::InputFileNotFound {
                path: clip.src_filepath.clone(),
            });
        }
        let dst = dst_dir.join(&clip.dst_filename);
        match mode {
            TrimMode::Copy => {
                let index = indexes
                    .get(&clip.src_filepath)
                    .expect("index built for every source");
                copy::trim_stream_copy(config, src, &dst, clip, index)?;
            }
            TrimMode::Reencode { crf } => {
                reencode::trim_with_reencode(config, src, &dst, clip, crf)?;
            }
        }
    }

    Ok(())
}
