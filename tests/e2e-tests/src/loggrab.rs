//! loggrab binary wrapper for E2E testing

use std::path::PathBuf;
use std::process::Command;

/// Result of one loggrab invocation
#[derive(Debug)]
pub struct RunOutcome {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Last non-empty stdout line, where loggrab prints the archive path
    pub fn last_line(&self) -> Option<&str> {
        self.stdout.lines().rev().find(|line| !line.trim().is_empty())
    }
}

/// Runs loggrab against one configuration file
pub struct LoggrabRunner {
    binary: PathBuf,
    config_path: PathBuf,
    pub test_dir: PathBuf,
}

impl LoggrabRunner {
    pub fn new(binary: PathBuf, config_path: PathBuf, test_dir: PathBuf) -> Self {
        Self {
            binary,
            config_path,
            test_dir,
        }
    }

    /// Run loggrab with `--debug --config <config>` followed by `args`.
    ///
    /// stderr is also saved to `loggrab.log` in the test directory.
    pub fn run(&self, args: &[&str]) -> Result<RunOutcome, String> {
        println!("Running loggrab {}", args.join(" "));

        let output = Command::new(&self.binary)
            .arg("--debug")
            .arg("--config")
            .arg(&self.config_path)
            .args(args)
            .current_dir(&self.test_dir)
            .output()
            .map_err(|e| format!("Failed to spawn loggrab: {}", e))?;

        let outcome = RunOutcome {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        let log_path = self.test_dir.join("loggrab.log");
        std::fs::write(&log_path, &outcome.stderr)
            .map_err(|e| format!("Failed to write {}: {}", log_path.display(), e))?;

        println!("loggrab exited with {:?}", outcome.exit_code);
        Ok(outcome)
    }
}
