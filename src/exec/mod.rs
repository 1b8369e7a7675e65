//! Child-process execution with incremental line consumption.
//!
//! The encoder and prober are driven as child processes whose diagnostic
//! output is consumed line-by-line while they run, so progress can be
//! surfaced before the process exits. The stream is a pull-based sequence of
//! lines: it ends when the process closes the pipe, and can only be
//! "restarted" by re-invoking the process.

use std::io::{BufRead, BufReader, Read};
use std::process::{Child, Command, Stdio};

use tracing::debug;

use crate::error::{TapecutError, TapecutResult};

/// Which pipe of the child carries the line stream we parse.
///
/// The encoder writes its duration/progress/filter events to stderr (its
/// stdout is the null sink); the prober writes CSV records to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputPipe {
    Stdout,
    Stderr,
}

/// A running child process plus a buffered reader over one of its pipes.
pub struct ProcessLines {
    program: String,
    child: Child,
    reader: BufReader<Box<dyn Read>>,
}

impl ProcessLines {
    /// Spawn the command and attach to the requested pipe.
    ///
    /// The unparsed pipe is discarded; stdin is closed.
    pub fn spawn(mut cmd: Command, pipe: OutputPipe) -> TapecutResult<Self> {
        let program = cmd.get_program().to_string_lossy().into_owned();
        debug!(%program, ?pipe, "spawning line-stream process");

        cmd.stdin(Stdio::null());
        match pipe {
            OutputPipe::Stdout => {
                cmd.stdout(Stdio::piped()).stderr(Stdio::null());
            }
            OutputPipe::Stderr => {
                cmd.stdout(Stdio::null()).stderr(Stdio::piped());
            }
        }

        let mut child = cmd.spawn().map_err(|source| TapecutError::ProcessSpawn {
            program: program.clone(),
            source,
        })?;

        let reader: Box<dyn Read> = match pipe {
            OutputPipe::Stdout => Box::new(child.stdout.take().expect("stdout was piped")),
            OutputPipe::Stderr => Box::new(child.stderr.take().expect("stderr was piped")),
        };

        Ok(Self {
            program,
            child,
            reader: BufReader::new(reader),
        })
    }

    /// Block until the next line is available, or `None` once the pipe closes.
    ///
    /// Trailing newline and carriage return are stripped.
    pub fn next_line(&mut self) -> TapecutResult<Option<String>> {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line)?;
        if n == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    /// Wait for the process to exit and demand a zero exit code.
    pub fn finish(mut self) -> TapecutResult<()> {
        let status = self.child.wait()?;
        check_status(&self.program, status)
    }

    /// Kill the process and reap it, discarding its exit status.
    ///
    /// Used when the consumer bails out mid-stream; the operation has already
    /// failed, so the child's own status is irrelevant.
    pub fn abort(mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Run a command to completion, demanding a zero exit code.
///
/// Used for trim invocations, where nothing is parsed beyond the exit status;
/// the child's own output passes straight through to the terminal.
pub fn run_checked(mut cmd: Command) -> TapecutResult<()> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    debug!(%program, "running process to completion");

    let status = cmd
        .stdin(Stdio::null())
        .status()
        .map_err(|source| TapecutError::ProcessSpawn {
            program: program.clone(),
            source,
        })?;
    check_status(&program, status)
}

fn check_status(program: &str, status: std::process::ExitStatus) -> TapecutResult<()> {
    if status.success() {
        Ok(())
    } else {
        Err(TapecutError::ProcessFailed {
            program: program.to_string(),
            code: status.code().unwrap_or(-1),
        })
    }
}
