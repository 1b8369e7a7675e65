//! Request/response seam to the editor-automation collaborator.
//!
//! The collaborator drives a non-scriptable editor; we only see a
//! fire-and-forget request channel and, for requests that produce data, a
//! file that eventually appears at a path we chose. The delivery mechanism
//! stays behind [`EditorChannel`]; nothing here knows whether requests travel
//! over window messages, a socket, or a shell command.

use std::path::Path;
use std::process::Command;
use std::time::{Duration, Instant};

use tracing::info;

use crate::config::Config;
use crate::error::{TapecutError, TapecutResult};
use crate::exec::run_checked;
use crate::interchange::{InputVideoFile, TimelineExport};

/// Poll interval while waiting for the collaborator's output file.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Fire-and-forget request delivery to the editor collaborator.
pub trait EditorChannel {
    /// Deliver one request. Returning `Ok` means the request was handed off,
    /// not that the collaborator finished acting on it.
    fn submit(&self, request: &str) -> TapecutResult<()>;
}

/// Delivers requests by running a configured external command with the
/// request text appended as the final argument.
pub struct CommandChannel {
    command: Vec<String>,
}

impl CommandChannel {
    /// Build a channel from the configured editor command.
    pub fn from_config(config: &Config) -> TapecutResult<Self> {
        if config.editor_command.is_empty() {
            return Err(TapecutError::Config {
                message: "editor_command is not configured".to_string(),
            });
        }
        Ok(Self {
            command: config.editor_command.clone(),
        })
    }
}

impl EditorChannel for CommandChannel {
    fn submit(&self, request: &str) -> TapecutResult<()> {
        let mut cmd = Command::new(&self.command[0]);
        cmd.args(&self.command[1..]).arg(request);
        run_checked(cmd)
    }
}

/// Wait for a collaborator-written file to appear.
///
/// Polls until the file exists or `timeout` elapses, then waits an extra
/// `settle` delay before returning, to tolerate a writer that creates the
/// file before it finishes writing.
pub fn await_output_file(path: &Path, timeout: Duration, settle: Duration) -> TapecutResult<()> {
    let start = Instant::now();
    loop {
        std::thread::sleep(POLL_INTERVAL);
        if path.is_file() {
            std::thread::sleep(settle);
            return Ok(());
        }
        if start.elapsed() > timeout {
            return Err(TapecutError::Timeout {
                path: path.display().to_string(),
                waited_ms: timeout.as_millis() as u64,
            });
        }
    }
}

/// Ask the collaborator to export the current timeline and parse the result.
///
/// The output path lives in an isolated temporary directory that exists only
/// for this exchange; the collaborator writes it, we read it, and the
/// directory is cleaned up when this function returns.
pub fn export_timeline(
    channel: &dyn EditorChannel,
    config: &Config,
) -> TapecutResult<TimelineExport> {
    let dir = tempfile::Builder::new().prefix("tapecut_editor_").tempdir()?;
    let out_path = dir.path().join("out.json");

    let request = format!(
        "export_vhs_project_to_json({})",
        serde_json::to_string(&out_path.display().to_string())?
    );
    channel.submit(&request)?;

    info!(
        "Waiting for output from editor script to be written to: {}",
        out_path.display()
    );
    await_output_file(
        &out_path,
        Duration::from_millis(config.handoff_timeout_ms),
        Duration::from_millis(config.handoff_settle_ms),
    )?;

    TimelineExport::from_json_file(&out_path)
}

/// Ask the collaborator to build an editing project for one tape.
pub fn build_project(
    channel: &dyn EditorChannel,
    tape_id: &str,
    videos: &[InputVideoFile],
) -> TapecutResult<()> {
    let request = format!(
        "create_vhs_project({}, {})",
        serde_json::to_string(tape_id)?,
        serde_json::to_string(videos)?
    );
    channel.submit(&request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_await_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ready.json");
        std::fs::write(&path, "{}").unwrap();
        await_output_file(&path, Duration::from_millis(500), Duration::ZERO).unwrap();
    }

    #[test]
    fn test_await_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.json");
        let err =
            await_output_file(&path, Duration::from_millis(250), Duration::ZERO).unwrap_err();
        assert!(matches!(err, TapecutError::Timeout { .. }));
    }

    /// Test double that plays the collaborator: extracts the output path from
    /// the export request and writes a canned timeline there.
    struct WritingChannel {
        requests: RefCell<Vec<String>>,
        payload: &'static str,
    }

    impl EditorChannel for WritingChannel {
        fn submit(&self, request: &str) -> TapecutResult<()> {
            self.requests.borrow_mut().push(request.to_string());
            if let Some(rest) = request.strip_prefix("export_vhs_project_to_json(") {
                let arg = rest.trim_end_matches(')');
                let path: String = serde_json::from_str(arg)?;
                std::fs::write(path, self.payload)?;
            }
            Ok(())
        }
    }

    #[test]
    fn test_export_timeline_round_trip() {
        let channel = WritingChannel {
            requests: RefCell::new(Vec::new()),
            payload: r#"{"type":"vhs_project","version":1,"name":"tape7","clips":[]}"#,
        };
        let mut config = Config::default();
        config.handoff_settle_ms = 0;
        config.handoff_timeout_ms = 500;

        let export = export_timeline(&channel, &config).unwrap();
        assert_eq!(export.name, "tape7");
        assert!(export.clips.is_empty());
        assert_eq!(channel.requests.borrow().len(), 1);
    }

    #[test]
    fn test_build_project_request_shape() {
        let channel = WritingChannel {
            requests: RefCell::new(Vec::new()),
            payload: "",
        };
        let videos = vec![InputVideoFile {
            path: "/f/tape7_raw.000.mkv".to_string(),
            cut_frames: vec![12, 99],
        }];
        build_project(&channel, "tape7", &videos).unwrap();

        let requests = channel.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].starts_with("create_vhs_project(\"tape7\", ["));
        assert!(requests[0].contains("\"cut_frames\":[12,99]"));
    }
}
