//! Keyframe index built from a stream-inspection probe.
//!
//! Stream copy cannot start mid-GOP, so copy-mode trims must land their
//! in-point on a keyframe. The index holds every keyframe timestamp of one
//! source file, in file order, and answers "nearest keyframe at or before"
//! queries by binary search.

use std::path::Path;
use std::process::Command;

use regex::Regex;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{TapecutError, TapecutResult};
use crate::exec::{OutputPipe, ProcessLines};
use crate::time::Timestamp;

/// Sorted keyframe timestamps for one source file. Built once, read-only.
#[derive(Debug, Clone)]
pub struct KeyframeIndex {
    path: String,
    times: Vec<Timestamp>,
}

impl KeyframeIndex {
    /// Probe a source file for keyframe timestamps.
    ///
    /// Runs the stream inspector over the first video stream, keeping the
    /// timestamp of every packet whose flags mark it as a keyframe. The probe
    /// stream is time-ordered; a timestamp that goes backwards means the
    /// inspector's output format changed, which is fatal.
    pub fn probe(config: &Config, video_path: &Path) -> TapecutResult<Self> {
        if !video_path.is_file() {
            return Err(TapecutError::InputFileNotFound {
                path: video_path.display().to_string(),
            });
        }
        info!(
            "Finding keyframe times in {}...",
            video_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| video_path.display().to_string())
        );

        let mut cmd = Command::new(&config.ffprobe_program);
        cmd.args(["-loglevel", "error", "-select_streams", "v:0"])
            .args(["-show_entries", "packet=pts_time,flags"])
            .args(["-of", "csv=print_section=0"])
            .arg(video_path);

        let keyframe_re = Regex::new(r"^([0-9.]+),K.*").unwrap();
        let mut stream = ProcessLines::spawn(cmd, OutputPipe::Stdout)?;
        let mut times: Vec<Timestamp> = Vec::new();
        loop {
            let line = match stream.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    stream.abort();
                    return Err(e);
                }
            };
            if let Some(caps) = keyframe_re.captures(&line) {
                let t = match Timestamp::parse_decimal(&caps[1]) {
                    Ok(t) => t,
                    Err(e) => {
                        stream.abort();
                        return Err(e);
                    }
                };
                if let Some(last) = times.last() {
                    if t < *last {
                        stream.abort();
                        return Err(TapecutError::StreamContract {
                            message: format!(
                                "keyframe timestamps not monotonic: {} after {}",
                                t, last
                            ),
                        });
                    }
                }
                times.push(t);
            }
        }
        stream.finish()?;

        debug!("{} keyframes in {}", times.len(), video_path.display());
        Ok(Self {
            path: video_path.display().to_string(),
            times,
        })
    }

    /// Build an index from already-known times. Times must be sorted ascending.
    pub fn from_times(path: &str, times: Vec<Timestamp>) -> Self {
        debug_assert!(times.windows(2).all(|w| w[0] <= w[1]));
        Self {
            path: path.to_string(),
            times,
        }
    }

    /// Number of keyframes in the index.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the index holds no keyframes.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// The largest keyframe timestamp at or before `t`.
    ///
    /// Querying an empty index is a contract violation; a query before the
    /// first keyframe is an explicit lookup failure, never a default.
    pub fn nearest_at_or_before(&self, t: Timestamp) -> TapecutResult<Timestamp> {
        if self.times.is_empty() {
            return Err(TapecutError::EmptyKeyframeIndex {
                path: self.path.clone(),
            });
        }
        let n = self.times.partition_point(|k| *k <= t);
        if n == 0 {
            return Err(TapecutError::NoKeyframeBefore {
                path: self.path.clone(),
                seconds: t.to_decimal_string(),
            });
        }
        Ok(self.times[n - 1])
    }
}
