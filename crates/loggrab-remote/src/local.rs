//! Local executor.
//!
//! Runs commands through `sh -c` on the machine loggrab runs on and
//! "downloads" by copying. Useful for servers that are the local host and
//! for exercising the whole capture flow without an SSH server.

use crate::executor::{CommandOutput, RemoteExecutor};
use async_trait::async_trait;
use loggrab_common::{GrabError, GrabResult};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Executes commands on the local host.
#[derive(Debug, Clone)]
pub struct LocalExecutor {
    host: String,
}

impl LocalExecutor {
    pub fn new() -> Self {
        Self {
            host: "localhost".to_string(),
        }
    }

    /// Create a local executor reporting under a different host name.
    pub fn with_host(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }
}

impl Default for LocalExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteExecutor for LocalExecutor {
    fn host(&self) -> &str {
        &self.host
    }

    async fn execute(&self, command: &str) -> GrabResult<CommandOutput> {
        debug!(host = %self.host, command = %command, "Executing local command");

        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| GrabError::connection(&self.host, format!("Failed to spawn sh: {}", e)))?;

        Ok(CommandOutput::from(output))
    }

    async fn download(&self, remote: &str, local: &Path) -> GrabResult<()> {
        debug!(host = %self.host, remote = %remote, local = %local.display(), "Copying file");

        tokio::fs::copy(remote, local).await.map_err(|e| {
            GrabError::transfer(&self.host, remote, local.display().to_string(), e.to_string())
        })?;

        Ok(())
    }
}
