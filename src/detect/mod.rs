//! Scene-cut detection via the encoder's diagnostic output.
//!
//! A detection run invokes the encoder with a scene-change filter graph and a
//! null sink, then parses its interleaved diagnostic lines in real time. Each
//! line is one of three things or nothing: a one-time duration announcement,
//! a progress update, or a cut event carrying the raw pts of a detected scene
//! change. A line that matches more than one pattern means the encoder's
//! output format shifted under us, which is fatal rather than ignorable.

use std::path::Path;
use std::process::Command;

use regex::Regex;
use tracing::info;

use crate::config::Config;
use crate::error::{TapecutError, TapecutResult};
use crate::exec::{OutputPipe, ProcessLines};
use crate::time::{timestamp_to_seconds, Rational, Timestamp};

/// Classifies encoder diagnostic lines and accumulates cut events.
///
/// Cut timestamps are kept in emission order. Progress updates are surfaced
/// through logging only; nothing downstream consumes them.
pub struct StreamEventParser {
    duration_re: Regex,
    progress_re: Regex,
    cut_re: Regex,
    label: String,
    duration: Option<Timestamp>,
    cuts: Vec<Timestamp>,
}

impl StreamEventParser {
    /// Create a parser; `label` names the source file in progress output.
    pub fn new(label: &str) -> Self {
        Self {
            duration_re: Regex::new(r"^  Duration: (\d{2}:\d{2}:\d{2}\.\d{2}), start:.*$").unwrap(),
            progress_re: Regex::new(r"^frame=.*time=(\d{2}:\d{2}:\d{2}\.\d{2}).*$").unwrap(),
            cut_re: Regex::new(r"^\[Parsed_showinfo.*\spts_time:([^\s]+)\s.*$").unwrap(),
            label: label.to_string(),
            duration: None,
            cuts: Vec::new(),
        }
    }

    /// Classify one line and update parser state.
    ///
    /// Lines matching none of the patterns are ignored. Contract violations
    /// (ambiguous line, duplicate duration, progress before duration) fail
    /// the whole detection run.
    pub fn feed_line(&mut self, line: &str) -> TapecutResult<()> {
        let duration_match = self.duration_re.captures(line);
        let progress_match = self.progress_re.captures(line);
        let cut_match = self.cut_re.captures(line);

        let matched = [
            duration_match.is_some(),
            progress_match.is_some(),
            cut_match.is_some(),
        ]
        .iter()
        .filter(|m| **m)
        .count();
        if matched > 1 {
            return Err(TapecutError::StreamContract {
                message: format!("line matches multiple event patterns: {}", line),
            });
        }

        if let Some(caps) = duration_match {
            if self.duration.is_some() {
                return Err(TapecutError::StreamContract {
                    message: "second duration announcement".to_string(),
                });
            }
            let duration = timestamp_to_seconds(&caps[1])?;
            if !duration.as_rational().is_positive() {
                return Err(TapecutError::StreamContract {
                    message: format!("non-positive duration announcement: {}", &caps[1]),
                });
            }
            self.duration = Some(duration);
        } else if let Some(caps) = progress_match {
            let total = self.duration.ok_or_else(|| TapecutError::StreamContract {
                message: "progress update before duration announcement".to_string(),
            })?;
            let position = timestamp_to_seconds(&caps[1])?;
            let pct =
                (position.as_rational() / total.as_rational() * Rational::from_int(100)).to_f64();
            info!(
                "[{} @ {}]: {:.2}% finished (identified {} cut frames)",
                self.label,
                &caps[1],
                pct,
                self.cuts.len()
            );
        } else if let Some(caps) = cut_match {
            self.cuts.push(Timestamp::parse_decimal(&caps[1])?);
        }

        Ok(())
    }

    /// The announced total duration, once seen.
    pub fn duration(&self) -> Option<Timestamp> {
        self.duration
    }

    /// Consume the parser, yielding cut timestamps in emission order.
    pub fn into_cut_times(self) -> Vec<Timestamp> {
        self.cuts
    }
}

/// Detect scene cuts in one source file.
///
/// Spawns the encoder with `select='gt(scene,<threshold>)',showinfo` and a
/// null output, consuming its diagnostic stream as it runs. A non-zero exit
/// code discards all partial results.
pub fn detect_cut_times(
    config: &Config,
    video_path: &Path,
    threshold: f64,
) -> TapecutResult<Vec<Timestamp>> {
    if !video_path.is_file() {
        return Err(TapecutError::InputFileNotFound {
            path: video_path.display().to_string(),
        });
    }

    let filename = video_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| video_path.display().to_string());
    info!(
        "Detecting cuts in {} (threshold: {:.3})...",
        filename, threshold
    );

    let video_filter = format!("select='gt(scene,{:.6})',showinfo", threshold);
    let mut cmd = Command::new(&config.ffmpeg_program);
    cmd.arg("-i")
        .arg(video_path)
        .arg("-filter:v")
        .arg(&video_filter)
        .args(["-f", "null", "-"]);

    let mut stream = ProcessLines::spawn(cmd, OutputPipe::Stderr)?;
    let mut parser = StreamEventParser::new(&filename);
    loop {
        match stream.next_line() {
            Ok(Some(line)) => {
                if let Err(e) = parser.feed_line(&line) {
                    stream.abort();
                    return Err(e);
                }
            }
            Ok(None) => break,
            Err(e) => {
                stream.abort();
                return Err(e);
            }
        }
    }
    stream.finish()?;

    let cuts = parser.into_cut_times();
    info!("Detected {} cuts in {}", cuts.len(), filename);
    Ok(cuts)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DURATION_LINE: &str = "  Duration: 00:10:00.00, start: 0.000000, bitrate: 15000 kb/s";

    fn progress_line(time: &str) -> String {
        format!("frame= 1200 fps=240 q=-0.0 size=N/A time={} bitrate=N/A speed=4.0x", time)
    }

    fn cut_line(pts: &str) -> String {
        format!(
            "[Parsed_showinfo_1 @ 0x55] n:   4 pts: 123456 pts_time:{} duration: 1668",
            pts
        )
    }

    #[test]
    fn test_synthetic_stream() {
        let mut parser = StreamEventParser::new("tape1_raw.000.mkv");
        parser.feed_line(DURATION_LINE).unwrap();
        parser.feed_line(&progress_line("00:01:00.00")).unwrap();
        parser.feed_line(&cut_line("61.436375")).unwrap();
        parser.feed_line(&progress_line("00:04:00.00")).unwrap();
        parser.feed_line(&cut_line("185.001483")).unwrap();
        parser.feed_line(&progress_line("00:09:30.00")).unwrap();
        parser.feed_line("video:0kB audio:132000kB subtitle:0kB").unwrap();

        let cuts = parser.into_cut_times();
        assert_eq!(cuts.len(), 2);
        assert_eq!(cuts[0], Timestamp::parse_decimal("61.436375").unwrap());
        assert_eq!(cuts[1], Timestamp::parse_decimal("185.001483").unwrap());
    }

    #[test]
    fn test_progress_before_duration_is_contract_violation() {
        let mut parser = StreamEventParser::new("x");
        let err = parser.feed_line(&progress_line("00:00:10.00")).unwrap_err();
        assert!(matches!(err, TapecutError::StreamContract { .. }));
    }

    #[test]
    fn test_second_duration_is_contract_violation() {
        let mut parser = StreamEventParser::new("x");
        parser.feed_line(DURATION_LINE).unwrap();
        let err = parser.feed_line(DURATION_LINE).unwrap_err();
        assert!(matches!(err, TapecutError::StreamContract { .. }));
    }

    #[test]
    fn test_zero_duration_is_contract_violation() {
        let mut parser = StreamEventParser::new("x");
        let err = parser
            .feed_line("  Duration: 00:00:00.00, start: 0.000000")
            .unwrap_err();
        assert!(matches!(err, TapecutError::StreamContract { .. }));
    }

    #[test]
    fn test_unrelated_lines_ignored() {
        let mut parser = StreamEventParser::new("x");
        parser.feed_line("Input #0, matroska,webm, from 'tape1_raw.000.mkv':").unwrap();
        parser.feed_line("    Stream #0:0: Video: h264 (High)").unwrap();
        parser.feed_line("").unwrap();
        assert!(parser.into_cut_times().is_empty());
    }

    #[test]
    fn test_cuts_kept_in_emission_order() {
        // Emission order is preserved even if timestamps arrive unsorted
        let mut parser = StreamEventParser::new("x");
        parser.feed_line(&cut_line("5.5")).unwrap();
        parser.feed_line(&cut_line("2.25")).unwrap();
        let cuts = parser.into_cut_times();
        assert_eq!(cuts[0], Timestamp::parse_decimal("5.5").unwrap());
        assert_eq!(cuts[1], Timestamp::parse_decimal("2.25").unwrap());
    }

    #[test]
    fn test_duration_accessor() {
        let mut parser = StreamEventParser::new("x");
        assert!(parser.duration().is_none());
        parser.feed_line(DURATION_LINE).unwrap();
        assert_eq!(
            parser.duration().unwrap(),
            timestamp_to_seconds("00:10:00.00").unwrap()
        );
    }
}
