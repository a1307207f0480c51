//! `termux-location` subprocess source
//!
//! Runs the Termux:API location command once per read and parses the JSON it
//! prints on stdout.

use crate::core::Fix;
use crate::hardware::{LocationSource, SourceError, SourceResult, SourceStatus};
use crate::processing::parser::parse_location_output;
use log::{debug, warn};
use std::io::{self, Read};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How often a running command is polled for completion
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Location source backed by an external command
pub struct TermuxLocationSource {
    command: String,
    args: Vec<String>,
    timeout: Duration,
    status: SourceStatus,
}

impl TermuxLocationSource {
    /// Create a source running `command` with a read timeout
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            timeout,
            status: SourceStatus::new(),
        }
    }

    /// Extra command-line arguments, e.g. `["-p", "network"]`
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    fn spawn(&self) -> SourceResult<Child> {
        Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SourceError::LaunchFailed {
                command: self.command.clone(),
                reason: e.to_string(),
            })
    }

    /// Run the command to completion or kill it at the deadline.
    ///
    /// Both pipes are drained on reader threads while the child runs, so a
    /// command printing more than a pipe buffer never stalls.
    fn run_command(&self) -> SourceResult<String> {
        let mut child = self.spawn()?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let deadline = Instant::now() + self.timeout;

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(SourceError::Timeout {
                        timeout_ms: self.timeout.as_millis() as u64,
                    });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(SourceError::CommandFailed {
                        command: self.command.clone(),
                        code: None,
                        stderr: e.to_string(),
                    });
                }
            }
        };

        let stdout = collect(stdout).map_err(|e| SourceError::InvalidOutput {
            details: format!("reading stdout: {}", e),
        })?;
        let stderr = collect(stderr).unwrap_or_default();

        if !status.success() {
            return Err(SourceError::CommandFailed {
                command: self.command.clone(),
                code: status.code(),
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }

        String::from_utf8(stdout).map_err(|e| SourceError::InvalidOutput {
            details: e.to_string(),
        })
    }
}

type PipeReader = Option<JoinHandle<io::Result<Vec<u8>>>>;

/// Read a child pipe to the end on its own thread
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> PipeReader {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buffer = Vec::new();
            pipe.read_to_end(&mut buffer)?;
            Ok(buffer)
        })
    })
}

fn collect(reader: PipeReader) -> io::Result<Vec<u8>> {
    match reader {
        Some(handle) => handle
            .join()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "pipe reader panicked"))?,
        None => Ok(Vec::new()),
    }
}

impl LocationSource for TermuxLocationSource {
    fn read_fix(&mut self) -> SourceResult<Option<Fix>> {
        let result = self.run_command().and_then(|stdout| {
            debug!("{} output: {}", self.command, stdout.trim());
            parse_location_output(&stdout, None).map_err(|e| SourceError::InvalidOutput {
                details: e.to_string(),
            })
        });

        if let Err(error) = &result {
            warn!("Error getting location: {}", error);
        }
        self.status.record(&result);
        result
    }

    fn status(&self) -> SourceStatus {
        self.status.clone()
    }

    fn name(&self) -> &str {
        &self.command
    }
}
