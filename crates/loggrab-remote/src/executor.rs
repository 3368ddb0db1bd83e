//! RemoteExecutor trait - the only capabilities log grabbing needs from a
//! remote host.
//!
//! Implementations run one shell command at a time and block the caller
//! (await) until it finishes. There is no timeout beyond what the underlying
//! client applies.

use async_trait::async_trait;
use loggrab_common::{GrabError, GrabResult};
use std::path::Path;
use std::process::Output;

/// Captured result of one shell command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit status of the command; `-1` when it was terminated by a signal.
    pub exit_status: i32,
}

impl CommandOutput {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>, exit_status: i32) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_status,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_status == 0
    }
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_status: output.status.code().unwrap_or(-1),
        }
    }
}

/// Shell access to one host.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Host name used in logs and error messages.
    fn host(&self) -> &str;

    /// Run `command` through the host's shell.
    ///
    /// A non-zero exit status is not an error here; only a failure of the
    /// transport itself is.
    async fn execute(&self, command: &str) -> GrabResult<CommandOutput>;

    /// Run `command` and turn a non-zero exit status into
    /// `GrabError::CommandFailed`.
    async fn execute_checked(&self, command: &str) -> GrabResult<CommandOutput> {
        let output = self.execute(command).await?;
        if !output.success() {
            return Err(GrabError::command_failed(
                self.host(),
                command,
                output.exit_status,
                output.stderr.trim(),
            ));
        }
        Ok(output)
    }

    /// Copy the remote file `remote` to `local`.
    async fn download(&self, remote: &str, local: &Path) -> GrabResult<()>;

    /// Release the session. Default implementation does nothing.
    async fn close(&self) -> GrabResult<()> {
        Ok(())
    }
}
