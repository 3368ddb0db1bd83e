//! Error types for loggrab.
//!
//! Every library crate returns `GrabResult<T>`. Remote failures keep the
//! host and the command that failed so the message reaching the user is the
//! remote error itself, with just enough context to find where it came from.
//!
//! ```rust
//! use loggrab_common::{GrabError, GrabResult};
//!
//! fn switch() -> GrabResult<()> {
//!     Err(GrabError::session_not_found("deploy@app-1:22"))
//! }
//!
//! assert!(switch().is_err());
//! ```

use thiserror::Error;

/// Result type alias for loggrab operations.
pub type GrabResult<T> = std::result::Result<T, GrabError>;

/// Main error type for loggrab operations.
#[derive(Debug, Error)]
pub enum GrabError {
    /// A remote shell command exited with a non-zero status where success
    /// was required.
    #[error("Command failed on {host} (exit status {exit_status}): {command}: {stderr}")]
    CommandFailed {
        host: String,
        command: String,
        exit_status: i32,
        stderr: String,
    },

    /// A remote command produced output that could not be interpreted.
    #[error("Unexpected output from {host} for `{command}`: {output:?}")]
    UnexpectedOutput {
        host: String,
        command: String,
        output: String,
    },

    /// Copying a remote file to the local host failed.
    #[error("Transfer failed from {host}:{remote} to {local}: {reason}")]
    Transfer {
        host: String,
        remote: String,
        local: String,
        reason: String,
    },

    /// Opening or talking to the remote host failed at the transport level.
    #[error("Connection to {host} failed: {reason}")]
    Connection { host: String, reason: String },

    #[error("Session not found: {alias}")]
    SessionNotFound { alias: String },

    #[error("Session already open: {alias}")]
    SessionAlreadyOpen { alias: String },

    #[error("No active session")]
    NoActiveSession,

    /// Packaging the staging tree failed.
    #[error("Archive error at {path}: {reason}")]
    Archive { path: String, reason: String },

    /// The per-test log directory could not be resolved or written.
    #[error("Log directory error at {path}: {reason}")]
    LogDirectory { path: String, reason: String },

    /// Saving or loading a prepared state file failed.
    #[error("State file error at {path}: {reason}")]
    StateFile { path: String, reason: String },

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    /// I/O error (wraps std::io::Error).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GrabError {
    pub fn command_failed(
        host: impl Into<String>,
        command: impl Into<String>,
        exit_status: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            host: host.into(),
            command: command.into(),
            exit_status,
            stderr: stderr.into(),
        }
    }

    pub fn unexpected_output(
        host: impl Into<String>,
        command: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self::UnexpectedOutput {
            host: host.into(),
            command: command.into(),
            output: output.into(),
        }
    }

    pub fn transfer(
        host: impl Into<String>,
        remote: impl Into<String>,
        local: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Transfer {
            host: host.into(),
            remote: remote.into(),
            local: local.into(),
            reason: reason.into(),
        }
    }

    pub fn connection(host: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Connection {
            host: host.into(),
            reason: reason.into(),
        }
    }

    pub fn session_not_found(alias: impl Into<String>) -> Self {
        Self::SessionNotFound {
            alias: alias.into(),
        }
    }

    pub fn session_already_open(alias: impl Into<String>) -> Self {
        Self::SessionAlreadyOpen {
            alias: alias.into(),
        }
    }

    pub fn archive(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Archive {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn log_directory(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LogDirectory {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn state_file(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StateFile {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}
