// E2E Test Framework for loggrab

pub mod assertions;
pub mod loggrab;

pub use loggrab::{LoggrabRunner, RunOutcome};

use std::env;
use std::path::{Path, PathBuf};

/// Get the path to the loggrab binary
pub fn get_loggrab_path() -> PathBuf {
    let mut path = env::current_exe()
        .expect("Failed to get current exe path")
        .parent()
        .expect("Failed to get parent dir")
        .to_path_buf();

    // If we're in deps/, go up one level
    if path.ends_with("deps") {
        path.pop();
    }

    #[cfg(windows)]
    path.push("loggrab.exe");

    #[cfg(not(windows))]
    path.push("loggrab");

    if !path.exists() {
        panic!("loggrab binary not found at: {} (run `cargo build -p loggrab` first)", path.display());
    }

    path
}

/// Create a temporary test directory
pub fn create_test_dir(test_name: &str) -> PathBuf {
    // Use target/tmp instead of system temp to keep artifacts next to the build
    let workspace_root = env::current_exe()
        .expect("Failed to get current exe path")
        .parent().expect("Failed to get parent")
        .parent().expect("Failed to get parent")
        .parent().expect("Failed to get workspace root")
        .to_path_buf();

    let temp_dir = workspace_root.join("target").join("tmp").join(format!("e2e-test-{}", test_name));

    if temp_dir.exists() {
        std::fs::remove_dir_all(&temp_dir).ok();
    }
    std::fs::create_dir_all(&temp_dir).expect("Failed to create test directory");
    temp_dir
}

/// Clean up test directory
pub fn cleanup_test_dir(dir: &Path) {
    if dir.exists() {
        std::fs::remove_dir_all(dir).ok();
    }
}

/// Append `line <n>` for every n in `range` to `path`
pub fn append_lines(path: &Path, range: std::ops::RangeInclusive<u32>) {
    use std::io::Write;

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .expect("Failed to open log file");
    for i in range {
        writeln!(file, "line {}", i).expect("Failed to write log line");
    }
}

/// Write a local-transport configuration watching `*.log` under `logs_dir`
/// and return its path.
pub fn write_local_config(test_dir: &Path, logs_dir: &Path, remote_tmp: &Path) -> PathBuf {
    let config = format!(
        r#"tmpdir: {tmp}
servers:
  - hostname: localhost
    transport: local
    subsystems:
      - name: app
        logs:
          - path_to_log: {logs}
            log_name: "*.log"
"#,
        tmp = remote_tmp.display(),
        logs = logs_dir.display(),
    );

    let path = test_dir.join("config.yaml");
    std::fs::write(&path, config).expect("Failed to write config");
    path
}
