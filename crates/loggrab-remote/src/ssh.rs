//! SSH executor backed by the OpenSSH client.
//!
//! One `SshExecutor` is one control-master connection: `open` authenticates
//! once and leaves a background master listening on a private control
//! socket, every `execute`/`download` multiplexes over that socket, and
//! `close` asks the master to exit.
//!
//! Password authentication goes through `sshpass -e` with the password in
//! the `SSHPASS` environment variable so it never shows up in the process
//! list, so `sshpass` must be installed on the local host for password
//! logins. Without a password the client runs in batch mode and relies on keys.

use crate::executor::{CommandOutput, RemoteExecutor};
use async_trait::async_trait;
use loggrab_common::{GrabError, GrabResult};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::process::Command;
use tracing::{debug, info, warn};

static NEXT_SOCKET_ID: AtomicU64 = AtomicU64::new(0);

/// Connection parameters for one SSH server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshTarget {
    pub hostname: String,
    pub port: u16,
    pub username: String,
    pub password: Option<String>,
}

impl SshTarget {
    /// `username@hostname`
    pub fn destination(&self) -> String {
        format!("{}@{}", self.username, self.hostname)
    }
}

/// An open control-master session to one server.
#[derive(Debug)]
pub struct SshExecutor {
    target: SshTarget,
    control_path: PathBuf,
}

impl SshExecutor {
    /// Authenticate and start the control master.
    pub async fn open(target: SshTarget) -> GrabResult<Self> {
        let control_path = std::env::temp_dir().join(format!(
            "loggrab-{}-{}.sock",
            std::process::id(),
            NEXT_SOCKET_ID.fetch_add(1, Ordering::SeqCst)
        ));

        // The master forks into the background and would keep a stderr pipe
        // open forever, so its diagnostics go to a file instead.
        let stderr_path = control_path.with_extension("err");
        let stderr_file = std::fs::File::create(&stderr_path)
            .map_err(|e| GrabError::connection(&target.hostname, format!("Failed to create {}: {}", stderr_path.display(), e)))?;

        let program = spawned_program(&target, "ssh", true);
        let mut command = Self::client(&target, "ssh", true);
        command
            .args(master_args(&target, &control_path))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(stderr_file));

        debug!(host = %target.hostname, port = target.port, "Starting SSH control master");

        let status = command
            .status()
            .await
            .map_err(|e| GrabError::connection(&target.hostname, format!("Failed to spawn {}: {}", program, e)));

        let diagnostics = std::fs::read_to_string(&stderr_path).unwrap_or_default();
        let _ = std::fs::remove_file(&stderr_path);

        let status = status?;
        if !status.success() {
            return Err(GrabError::connection(
                &target.hostname,
                format!("{} exited with {}: {}", program, status, diagnostics.trim()),
            ));
        }

        info!(host = %target.hostname, port = target.port, user = %target.username, "SSH session opened");

        Ok(Self {
            target,
            control_path,
        })
    }

    fn client(target: &SshTarget, program: &str, authenticate: bool) -> Command {
        match (&target.password, authenticate) {
            (Some(password), true) => {
                let mut command = Command::new(spawned_program(target, program, authenticate));
                command.arg("-e").arg(program).env("SSHPASS", password);
                command
            }
            _ => Command::new(program),
        }
    }
}

#[async_trait]
impl RemoteExecutor for SshExecutor {
    fn host(&self) -> &str {
        &self.target.hostname
    }

    async fn execute(&self, command: &str) -> GrabResult<CommandOutput> {
        debug!(host = %self.target.hostname, command = %command, "Executing remote command");

        let output = Self::client(&self.target, "ssh", false)
            .args(command_args(&self.target, &self.control_path, command))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| GrabError::connection(&self.target.hostname, format!("Failed to spawn ssh: {}", e)))?;

        let output = CommandOutput::from(output);

        // 255 is reserved by ssh for its own failures.
        if output.exit_status == 255 {
            return Err(GrabError::connection(&self.target.hostname, output.stderr.trim()));
        }

        Ok(output)
    }

    async fn download(&self, remote: &str, local: &Path) -> GrabResult<()> {
        debug!(host = %self.target.hostname, remote = %remote, local = %local.display(), "Downloading file");

        let output = Self::client(&self.target, "scp", false)
            .args(scp_args(&self.target, &self.control_path, remote, local))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                GrabError::transfer(&self.target.hostname, remote, local.display().to_string(), e.to_string())
            })?;

        if !output.status.success() {
            return Err(GrabError::transfer(
                &self.target.hostname,
                remote,
                local.display().to_string(),
                String::from_utf8_lossy(&output.stderr).trim(),
            ));
        }

        Ok(())
    }

    async fn close(&self) -> GrabResult<()> {
        let output = Command::new("ssh")
            .arg("-S")
            .arg(&self.control_path)
            .args(["-O", "exit"])
            .arg(self.target.destination())
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| GrabError::connection(&self.target.hostname, format!("Failed to spawn ssh: {}", e)))?;

        if !output.status.success() {
            warn!(
                host = %self.target.hostname,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "SSH control master did not acknowledge exit"
            );
        }

        info!(host = %self.target.hostname, "SSH session closed");
        Ok(())
    }
}

fn common_options(target: &SshTarget) -> Vec<String> {
    let mut options = vec!["-o".to_string(), "StrictHostKeyChecking=accept-new".to_string()];
    if target.password.is_none() {
        options.push("-o".to_string());
        options.push("BatchMode=yes".to_string());
    }
    options
}

/// The executable actually started for `program`: password logins run it
/// under `sshpass`.
fn spawned_program<'a>(target: &SshTarget, program: &'a str, authenticate: bool) -> &'a str {
    if authenticate && target.password.is_some() {
        "sshpass"
    } else {
        program
    }
}

fn master_args(target: &SshTarget, control_path: &Path) -> Vec<String> {
    let mut args = vec![
        "-M".to_string(),
        "-N".to_string(),
        "-f".to_string(),
        "-o".to_string(),
        "ControlPersist=yes".to_string(),
        "-S".to_string(),
        control_path.display().to_string(),
        "-p".to_string(),
        target.port.to_string(),
    ];
    args.extend(common_options(target));
    args.push(target.destination());
    args
}

fn command_args(target: &SshTarget, control_path: &Path, command: &str) -> Vec<String> {
    let mut args = vec![
        "-S".to_string(),
        control_path.display().to_string(),
        "-p".to_string(),
        target.port.to_string(),
    ];
    args.extend(common_options(target));
    args.push(target.destination());
    args.push("--".to_string());
    args.push(command.to_string());
    args
}

fn scp_args(target: &SshTarget, control_path: &Path, remote: &str, local: &Path) -> Vec<String> {
    let mut args = vec![
        "-q".to_string(),
        "-o".to_string(),
        format!("ControlPath={}", control_path.display()),
        "-P".to_string(),
        target.port.to_string(),
    ];
    args.extend(common_options(target));
    args.push(format!("{}:{}", target.destination(), remote));
    args.push(local.display().to_string());
    args
}
