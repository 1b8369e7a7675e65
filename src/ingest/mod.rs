//! Capture ingest: cutting raw recordings into per-tape directories.
//!
//! The capture appliance drops timestamped files into one shared directory.
//! Cutting a recording claims everything currently in there for one tape,
//! renaming the files into the tape's storage directory with stable,
//! zero-padded sequence numbers.

use std::path::PathBuf;

use regex::Regex;
use tracing::info;

use crate::config::Config;
use crate::detect::detect_cut_times;
use crate::error::{TapecutError, TapecutResult};
use crate::frames::derive_cut_frames;
use crate::interchange::InputVideoFile;

/// Result of cutting a recording: where the footage went and how many files.
#[derive(Debug, Clone)]
pub struct CutSummary {
    /// The tape directory the footage was moved into
    pub tape_dir: PathBuf,
    /// Number of capture files claimed
    pub file_count: usize,
}

/// Move every capture file into a new per-tape directory.
///
/// Capture files are named `YYYY-MM-DD HH-MM-SS.mp4` by the appliance; they
/// sort chronologically by name, which fixes the raw sequence numbering.
/// Refuses to run if the tape directory already exists or there is nothing
/// to claim.
pub fn cut_recording(config: &Config, tape_id: &str) -> TapecutResult<CutSummary> {
    let capture_re = Regex::new(r"(?i)^\d{4}-\d{2}-\d{2} \d{2}-\d{2}-\d{2}\.mp4$").unwrap();

    let tape_dir = config.tape_dir(tape_id);
    if tape_dir.is_dir() {
        return Err(TapecutError::TapeDirExists {
            path: tape_dir.display().to_string(),
        });
    }

    let mut src_filenames: Vec<String> = Vec::new();
    for entry in std::fs::read_dir(&config.capture_root)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if capture_re.is_match(&name) {
            src_filenames.push(name);
        }
    }
    if src_filenames.is_empty() {
        return Err(TapecutError::NoCaptureFiles {
            path: config.capture_root.display().to_string(),
        });
    }
    src_filenames.sort();

    std::fs::create_dir_all(&config.storage_root)?;
    std::fs::create_dir(&tape_dir)?;

    info!("Cutting {}...", tape_id);
    for (i, src_filename) in src_filenames.iter().enumerate() {
        let src_filepath = config.capture_root.join(src_filename);
        let dst_filepath = tape_dir.join(format!("{}_raw.{:03}.mp4", tape_id, i));
        info!("{} --> {}", src_filepath.display(), dst_filepath.display());
        std::fs::rename(&src_filepath, &dst_filepath)?;
    }

    info!(
        "Cut new recording to {} from {} captured video files.",
        tape_dir.display(),
        src_filenames.len()
    );
    Ok(CutSummary {
        tape_dir,
        file_count: src_filenames.len(),
    })
}

/// List a tape's raw footage files, sorted by sequence number.
pub fn raw_footage(config: &Config, tape_id: &str) -> TapecutResult<Vec<PathBuf>> {
    let tape_dir = config.tape_dir(tape_id);
    let not_found = || TapecutError::NoRawFootage {
        tape_id: tape_id.to_string(),
        path: tape_dir.display().to_string(),
    };
    if !tape_dir.is_dir() {
        return Err(not_found());
    }

    let raw_re = Regex::new(&format!(
        r"^{}_raw\.\d{{3}}\.(mp4|mkv)$",
        regex::escape(tape_id)
    ))
    .unwrap();

    let mut filenames: Vec<String> = Vec::new();
    for entry in std::fs::read_dir(&tape_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if raw_re.is_match(&name) {
            filenames.push(name);
        }
    }
    if filenames.is_empty() {
        return Err(not_found());
    }
    filenames.sort();
    Ok(filenames.into_iter().map(|f| tape_dir.join(f)).collect())
}

/// Build the input-video list for the project-builder collaborator.
///
/// Optionally runs cut detection over each raw file, deriving the
/// deduplicated sorted frame indices the editor will place markers at.
pub fn collect_input_videos(
    config: &Config,
    tape_id: &str,
    detect_cuts: bool,
    threshold: f64,
) -> TapecutResult<Vec<InputVideoFile>> {
    let mut videos = Vec::new();
    for raw_path in raw_footage(config, tape_id)? {
        let cut_frames = if detect_cuts {
            let cut_times = detect_cut_times(config, &raw_path, threshold)?;
            derive_cut_frames(&cut_times)
        } else {
            Vec::new()
        };
        videos.push(InputVideoFile {
            path: raw_path.display().to_string(),
            cut_frames,
        });
    }
    Ok(videos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(root: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.capture_root = root.join("capture");
        config.storage_root = root.join("storage");
        config
    }

    #[test]
    fn test_cut_recording_moves_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        std::fs::create_dir_all(&config.capture_root).unwrap();

        // Deliberately created out of order; naming fixes the sequence
        for name in [
            "2024-03-02 10-00-00.mp4",
            "2024-03-01 09-30-00.mp4",
            "notes.txt",
            "2024-03-01 12-00-00.MP4",
        ] {
            std::fs::write(config.capture_root.join(name), name).unwrap();
        }

        let summary = cut_recording(&config, "tape9").unwrap();
        assert_eq!(summary.file_count, 3);

        let read = |f: &str| std::fs::read_to_string(summary.tape_dir.join(f)).unwrap();
        assert_eq!(read("tape9_raw.000.mp4"), "2024-03-01 09-30-00.mp4");
        assert_eq!(read("tape9_raw.001.mp4"), "2024-03-01 12-00-00.MP4");
        assert_eq!(read("tape9_raw.002.mp4"), "2024-03-02 10-00-00.mp4");
        // Non-capture files stay behind
        assert!(config.capture_root.join("notes.txt").is_file());
    }

    #[test]
    fn test_cut_recording_refuses_existing_tape_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        std::fs::create_dir_all(&config.capture_root).unwrap();
        std::fs::create_dir_all(config.tape_dir("tape9")).unwrap();

        assert!(matches!(
            cut_recording(&config, "tape9"),
            Err(TapecutError::TapeDirExists { .. })
        ));
    }

    #[test]
    fn test_cut_recording_requires_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        std::fs::create_dir_all(&config.capture_root).unwrap();

        assert!(matches!(
            cut_recording(&config, "tape9"),
            Err(TapecutError::NoCaptureFiles { .. })
        ));
    }

    #[test]
    fn test_raw_footage_listing() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let tape_dir = config.tape_dir("tape9");
        std::fs::create_dir_all(&tape_dir).unwrap();
        for name in [
            "tape9_raw.001.mkv",
            "tape9_raw.000.mkv",
            "tape9_raw.002.mp4",
            "tape9_trimmed.000.mkv",
            "other_raw.000.mkv",
        ] {
            std::fs::write(tape_dir.join(name), "").unwrap();
        }

        let files = raw_footage(&config, "tape9").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["tape9_raw.000.mkv", "tape9_raw.001.mkv", "tape9_raw.002.mp4"]
        );
    }

    #[test]
    fn test_raw_footage_missing_tape() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        assert!(matches!(
            raw_footage(&config, "tape9"),
            Err(TapecutError::NoRawFootage { .. })
        ));
    }

    #[test]
    fn test_collect_without_detection() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let tape_dir = config.tape_dir("tape9");
        std::fs::create_dir_all(&tape_dir).unwrap();
        std::fs::write(tape_dir.join("tape9_raw.000.mkv"), "").unwrap();

        let videos = collect_input_videos(&config, "tape9", false, 0.2).unwrap();
        assert_eq!(videos.len(), 1);
        assert!(videos[0].cut_frames.is_empty());
        assert!(videos[0].path.ends_with("tape9_raw.000.mkv"));
    }
}
