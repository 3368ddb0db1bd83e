//! Scripted executor for unit tests

use async_trait::async_trait;
use loggrab_common::{GrabError, GrabResult};
use loggrab_remote::{CommandOutput, RemoteExecutor};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Answers commands by the first rule whose needle the command contains.
/// Unmatched commands succeed with empty output.
#[derive(Clone)]
pub(crate) struct ScriptedExecutor {
    host: String,
    rules: Arc<Mutex<Vec<(String, CommandOutput)>>>,
    commands: Arc<Mutex<Vec<String>>>,
    downloads: Arc<Mutex<Vec<(String, PathBuf)>>>,
    fail_downloads: bool,
}

impl ScriptedExecutor {
    pub(crate) fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            rules: Arc::new(Mutex::new(Vec::new())),
            commands: Arc::new(Mutex::new(Vec::new())),
            downloads: Arc::new(Mutex::new(Vec::new())),
            fail_downloads: false,
        }
    }

    pub(crate) fn failing_downloads(mut self) -> Self {
        self.fail_downloads = true;
        self
    }

    pub(crate) fn on(&self, needle: &str, stdout: &str, exit_status: i32) -> &Self {
        self.rules
            .lock()
            .unwrap()
            .push((needle.to_string(), CommandOutput::new(stdout, "", exit_status)));
        self
    }

    /// Replace the answers for `needle`, e.g. to move a line count forward.
    pub(crate) fn set(&self, needle: &str, stdout: &str, exit_status: i32) -> &Self {
        self.rules.lock().unwrap().retain(|(n, _)| n != needle);
        self.on(needle, stdout, exit_status)
    }

    pub(crate) fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub(crate) fn downloads(&self) -> Vec<(String, PathBuf)> {
        self.downloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteExecutor for ScriptedExecutor {
    fn host(&self) -> &str {
        &self.host
    }

    async fn execute(&self, command: &str) -> GrabResult<CommandOutput> {
        self.commands.lock().unwrap().push(command.to_string());

        let rules = self.rules.lock().unwrap();
        let output = rules
            .iter()
            .find(|(needle, _)| command.contains(needle.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_default();
        Ok(output)
    }

    async fn download(&self, remote: &str, local: &Path) -> GrabResult<()> {
        self.downloads
            .lock()
            .unwrap()
            .push((remote.to_string(), local.to_path_buf()));

        if self.fail_downloads {
            return Err(GrabError::transfer(&self.host, remote, local.display().to_string(), "scp: connection lost"));
        }

        std::fs::write(local, remote.as_bytes())?;
        Ok(())
    }
}
