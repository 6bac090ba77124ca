//! Subprocess execution with timeouts.
//!
//! # Responsibilities
//! - Spawn a program with a discrete argument vector (no shell)
//! - Capture stdout/stderr while the child runs
//! - Kill the child when its timeout elapses
//! - Normalize every outcome into a `CommandResult`
//!
//! # Design Decisions
//! - There is no entry point that accepts a command line string
//! - Output captured before a timeout is kept in the result
//! - No retries: a failed run is reported once

use std::ffi::OsStr;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::observability::metrics;

/// Normalized outcome of a subprocess run.
///
/// `ok` is true only if the child launched and exited with status zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub ok: bool,
    pub stdout: String,
    pub stderr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub timed_out: bool,
}

impl CommandResult {
    /// Message describing a failed run, preferring the child's stderr.
    pub fn error_message(&self) -> String {
        self.stderr.clone()
    }

    fn launch_failure(err: std::io::Error) -> Self {
        Self {
            ok: false,
            stdout: String::new(),
            stderr: format!("failed to launch command: {err}"),
            exit_code: None,
            timed_out: false,
        }
    }
}

/// Runs external programs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessInvoker;

impl ProcessInvoker {
    pub fn new() -> Self {
        Self
    }

    /// Run `program` with `args` and wait at most `timeout` for it to exit.
    ///
    /// The child inherits the environment of this process.
    pub async fn run<P, I, S>(&self, program: P, args: I, timeout: Duration) -> CommandResult
    where
        P: AsRef<OsStr>,
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let program = program.as_ref();
        let label = program.to_string_lossy().into_owned();
        let start = Instant::now();

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::error!(program = %label, error = %e, "Failed to launch command");
                metrics::record_command(&label, "launch_error");
                return CommandResult::launch_failure(e);
            }
        };

        let mut stdout_pipe = child.stdout.take();
        let mut stderr_pipe = child.stderr.take();
        let mut stdout_buf = Vec::new();
        let mut stderr_buf = Vec::new();

        // Buffers live outside the timed future so partial output survives a timeout.
        let waited = {
            let run = async {
                let read_stdout = async {
                    if let Some(pipe) = stdout_pipe.as_mut() {
                        if let Err(e) = pipe.read_to_end(&mut stdout_buf).await {
                            tracing::debug!(program = %label, error = %e, "Failed to read stdout");
                        }
                    }
                };
                let read_stderr = async {
                    if let Some(pipe) = stderr_pipe.as_mut() {
                        if let Err(e) = pipe.read_to_end(&mut stderr_buf).await {
                            tracing::debug!(program = %label, error = %e, "Failed to read stderr");
                        }
                    }
                };
                let (status, _, _) = tokio::join!(child.wait(), read_stdout, read_stderr);
                status
            };
            tokio::time::timeout(timeout, run).await
        };

        let stdout = String::from_utf8_lossy(&stdout_buf).trim().to_string();
        let stderr = String::from_utf8_lossy(&stderr_buf).trim().to_string();
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match waited {
            Ok(Ok(status)) if status.success() => {
                tracing::debug!(program = %label, elapsed_ms, "Command succeeded");
                metrics::record_command(&label, "success");
                CommandResult {
                    ok: true,
                    stdout,
                    stderr,
                    exit_code: status.code(),
                    timed_out: false,
                }
            }
            Ok(Ok(status)) => {
                tracing::warn!(program = %label, status = %status, elapsed_ms, "Command failed");
                metrics::record_command(&label, "failure");
                CommandResult {
                    ok: false,
                    stdout,
                    stderr: if stderr.is_empty() { describe_status(status) } else { stderr },
                    exit_code: status.code(),
                    timed_out: false,
                }
            }
            Ok(Err(e)) => {
                tracing::error!(program = %label, error = %e, "Failed to wait for command");
                metrics::record_command(&label, "wait_error");
                CommandResult {
                    ok: false,
                    stdout,
                    stderr: if stderr.is_empty() { e.to_string() } else { stderr },
                    exit_code: None,
                    timed_out: false,
                }
            }
            Err(_) => {
                if let Err(e) = child.kill().await {
                    tracing::debug!(program = %label, error = %e, "Kill after timeout failed");
                }
                tracing::warn!(
                    program = %label,
                    timeout_ms = timeout.as_millis() as u64,
                    "Command timed out"
                );
                metrics::record_command(&label, "timeout");
                CommandResult {
                    ok: false,
                    stdout,
                    stderr: if stderr.is_empty() {
                        format!("command timed out after {}ms", timeout.as_millis())
                    } else {
                        stderr
                    },
                    exit_code: None,
                    timed_out: true,
                }
            }
        }
    }
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("command exited with status {code}"),
        None => format!("command terminated: {status}"),
    }
}
