//! Extraction of the lines appended since tracking.
//!
//! For every tracked file that grew, the new lines are cut into a temp file
//! on the server, compressed there and downloaded into the local staging
//! tree as `<staging>/<subsystem>/<timestamp>_<name>.gz`.

use crate::commands;
use crate::tracker;
use crate::types::{ExtractedFragment, ServerLogs, TrackedLog};
use loggrab_common::{GrabResult, SessionAlias};
use loggrab_remote::RemoteExecutor;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Settings shared by every file of one extraction run
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    /// Remote directory for the intermediate files
    pub tmpdir: String,
    /// Local staging root, `<base>/logs`
    pub staging_dir: PathBuf,
    /// Epoch seconds used in every file name of the run
    pub timestamp: i64,
}

impl ExtractionContext {
    fn remote_temp(&self, log: &TrackedLog) -> String {
        commands::join_remote(&self.tmpdir, &format!("{}_{}", self.timestamp, log.name))
    }

    fn local_target(&self, subsystem: &str, log: &TrackedLog) -> PathBuf {
        self.staging_dir
            .join(subsystem)
            .join(format!("{}_{}.gz", self.timestamp, log.name))
    }
}

/// Extract every tracked file of one server, in tracking order.
///
/// The first failing cut, compression or download aborts the run.
pub async fn extract_server(
    executor: &dyn RemoteExecutor,
    server: &ServerLogs,
    context: &ExtractionContext,
) -> GrabResult<Vec<ExtractedFragment>> {
    let mut fragments = Vec::new();

    for subsystem in &server.subsystems {
        for log in &subsystem.logs {
            if let Some(fragment) =
                extract_log(executor, &server.alias, &subsystem.name, log, context).await?
            {
                fragments.push(fragment);
            }
        }
    }

    if !fragments.is_empty() {
        info!(
            host = %server.hostname,
            fragments = fragments.len(),
            "Extracted new log lines"
        );
    }

    Ok(fragments)
}

/// Extract one file. `None` when it did not grow.
pub async fn extract_log(
    executor: &dyn RemoteExecutor,
    alias: &SessionAlias,
    subsystem: &str,
    log: &TrackedLog,
    context: &ExtractionContext,
) -> GrabResult<Option<ExtractedFragment>> {
    let path = log.remote_path();

    // A failing `wc` means the file is gone; transport errors propagate
    let current = match tracker::count_lines(executor, &path).await? {
        Some(count) => count,
        None => return Ok(None),
    };

    if current <= log.line_count {
        debug!(
            host = %executor.host(),
            path = %path,
            tracked = log.line_count,
            current,
            "No new lines"
        );
        return Ok(None);
    }

    let first_line = log.line_count + 1;
    let temp = context.remote_temp(log);
    let compressed = format!("{}.gz", temp);
    let local = context.local_target(subsystem, log);

    executor
        .execute_checked(&commands::cut_tail(&path, first_line, &temp))
        .await?;
    executor.execute_checked(&commands::compress(&temp)).await?;

    if let Some(parent) = local.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    executor.download(&compressed, &local).await?;

    cleanup(executor, &[&temp, &compressed]).await;

    debug!(
        host = %executor.host(),
        subsystem = %subsystem,
        path = %path,
        first_line,
        last_line = current,
        local = %local.display(),
        "Fragment downloaded"
    );

    Ok(Some(ExtractedFragment {
        alias: alias.clone(),
        subsystem: subsystem.to_string(),
        log_name: log.name.clone(),
        first_line,
        last_line: current,
        local_path: local,
    }))
}

async fn cleanup(executor: &dyn RemoteExecutor, paths: &[&str]) {
    match executor.execute(&commands::remove(paths)).await {
        Ok(output) if output.success() => {}
        Ok(output) => warn!(
            host = %executor.host(),
            stderr = %output.stderr.trim(),
            "Failed to remove remote temp files"
        ),
        Err(e) => warn!(host = %executor.host(), error = %e, "Failed to remove remote temp files"),
    }
}

/// Staging directory under an extraction base directory.
pub fn staging_dir(base_dir: &Path) -> PathBuf {
    base_dir.join(crate::archive::STAGING_DIR_NAME)
}
