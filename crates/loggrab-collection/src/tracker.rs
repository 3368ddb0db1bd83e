//! Log offset tracking.
//!
//! Resolves every configured pattern on the server and records how many
//! lines each matching file has. Missing files are not an error: a pattern
//! whose listing fails or comes back empty simply contributes nothing, and
//! subsystems (and servers) left without any file are dropped.

use crate::commands;
use crate::config::{LogPattern, ServerConfig, SubsystemConfig};
use crate::types::{ServerLogs, SubsystemLogs, TrackedLog};
use loggrab_common::{GrabError, GrabResult};
use loggrab_remote::RemoteExecutor;
use tracing::{debug, info, warn};

/// Track every subsystem of one server.
///
/// Returns `None` when no subsystem has a matching file.
pub async fn track_server(
    executor: &dyn RemoteExecutor,
    server: &ServerConfig,
) -> GrabResult<Option<ServerLogs>> {
    let mut subsystems = Vec::new();

    for subsystem in &server.subsystems {
        if let Some(tracked) = track_subsystem(executor, subsystem).await? {
            subsystems.push(tracked);
        }
    }

    if subsystems.is_empty() {
        debug!(host = %server.hostname, "No log files matched on server");
        return Ok(None);
    }

    info!(
        host = %server.hostname,
        subsystems = subsystems.len(),
        files = subsystems.iter().map(|s| s.logs.len()).sum::<usize>(),
        "Log offsets recorded"
    );

    Ok(Some(ServerLogs {
        alias: server.alias(),
        hostname: server.hostname.clone(),
        subsystems,
    }))
}

/// Track one subsystem. Returns `None` when none of its patterns matched.
pub async fn track_subsystem(
    executor: &dyn RemoteExecutor,
    subsystem: &SubsystemConfig,
) -> GrabResult<Option<SubsystemLogs>> {
    let mut logs = Vec::new();

    for pattern in &subsystem.logs {
        for name in resolve_pattern(executor, pattern).await? {
            let path = commands::join_remote(&pattern.path_to_log, &name);
            match count_lines(executor, &path).await? {
                Some(line_count) => {
                    debug!(
                        host = %executor.host(),
                        subsystem = %subsystem.name,
                        path = %path,
                        line_count,
                        "Tracking log file"
                    );
                    logs.push(TrackedLog {
                        directory: pattern.path_to_log.clone(),
                        name,
                        line_count,
                    });
                }
                None => continue,
            }
        }
    }

    if logs.is_empty() {
        return Ok(None);
    }

    Ok(Some(SubsystemLogs {
        name: subsystem.name.clone(),
        logs,
    }))
}

/// File names a pattern currently resolves to on the host.
pub async fn resolve_pattern(
    executor: &dyn RemoteExecutor,
    pattern: &LogPattern,
) -> GrabResult<Vec<String>> {
    let command = commands::list_logs(pattern);
    let output = executor.execute(&command).await?;

    if !output.success() {
        debug!(
            host = %executor.host(),
            pattern = %commands::join_remote(&pattern.path_to_log, &pattern.log_name),
            exit_status = output.exit_status,
            "Pattern matched no files"
        );
        return Ok(Vec::new());
    }

    Ok(commands::parse_file_list(&output.stdout))
}

/// Current line count of a remote file.
///
/// `None` when the count command fails, e.g. because the file went away.
pub async fn count_lines(executor: &dyn RemoteExecutor, path: &str) -> GrabResult<Option<u64>> {
    let command = commands::count_lines(path);
    let output = executor.execute(&command).await?;

    if !output.success() {
        warn!(
            host = %executor.host(),
            path = %path,
            stderr = %output.stderr.trim(),
            "Could not count lines"
        );
        return Ok(None);
    }

    commands::parse_line_count(&output.stdout)
        .map(Some)
        .ok_or_else(|| GrabError::unexpected_output(executor.host(), command, output.stdout))
}
