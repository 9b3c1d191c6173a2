//! Subprocess execution with a hard timeout.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::command;
use crate::error::{Result, ScanError};

/// Runs one external command to completion.
///
/// This is the seam between the scanner and the operating system; tests
/// drive scans through a scripted implementation instead of spawning
/// anything.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Executes `program` with `args`, waiting until it exits or `timeout`
    /// elapses. Returns the exit code on success; a non-zero exit, a spawn
    /// failure, or a timeout is a [`ScanError::ProcessExecution`].
    async fn run(&self, program: &str, args: &[String], timeout: Duration) -> Result<i32>;
}

/// [`ProcessRunner`] backed by a real subprocess.
pub struct SystemRunner;

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[String], timeout: Duration) -> Result<i32> {
        let rendered = command::render(program, args);
        debug!("executing `{rendered}`");

        let mut child = Command::new(program);
        child
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(timeout, child.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                return Err(ScanError::ProcessExecution {
                    command: rendered,
                    stderr: err.to_string(),
                });
            }
            // The future is dropped here, which kills the child.
            Err(_) => {
                return Err(ScanError::ProcessExecution {
                    command: rendered,
                    stderr: format!("timed out after {:.1}s", timeout.as_secs_f64()),
                });
            }
        };

        if !output.status.success() {
            return Err(ScanError::ProcessExecution {
                command: rendered,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(output.status.code().unwrap_or(0))
    }
}
