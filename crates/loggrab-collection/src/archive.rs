//! Packaging of the staged fragments into one zip archive

use loggrab_common::{GrabError, GrabResult};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Name of the staging directory under the extraction base directory
pub const STAGING_DIR_NAME: &str = "logs";

/// File name of the archive produced by the run stamped `timestamp`.
pub fn archive_name(timestamp: i64) -> String {
    format!("{}_logs.zip", timestamp)
}

/// Zip the staging tree into `<dest_dir>/<timestamp>_logs.zip` and remove it.
///
/// Returns `None` without writing anything when the staging directory does
/// not exist or holds no files. An empty staging directory is removed.
pub async fn assemble_archive(
    staging_dir: &Path,
    dest_dir: &Path,
    timestamp: i64,
) -> GrabResult<Option<PathBuf>> {
    if !tokio::fs::try_exists(staging_dir).await? {
        debug!(staging = %staging_dir.display(), "Nothing staged, no archive");
        return Ok(None);
    }

    let archive_path = dest_dir.join(archive_name(timestamp));
    let staging = staging_dir.to_path_buf();
    let target = archive_path.clone();

    let entries = tokio::task::spawn_blocking(move || write_archive(&staging, &target))
        .await
        .map_err(|e| GrabError::archive(archive_path.display().to_string(), e.to_string()))??;

    tokio::fs::remove_dir_all(staging_dir).await?;

    if entries == 0 {
        debug!(staging = %staging_dir.display(), "Staging directory was empty, no archive");
        return Ok(None);
    }

    info!(archive = %archive_path.display(), entries, "Log archive written");
    Ok(Some(archive_path))
}

/// Blocking part: walk the staging tree and write every file. Returns the
/// number of entries; nothing is created when there are none.
fn write_archive(staging_dir: &Path, archive_path: &Path) -> GrabResult<usize> {
    let archive_err = |reason: String| GrabError::archive(archive_path.display().to_string(), reason);

    let mut files = Vec::new();
    for entry in WalkDir::new(staging_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| archive_err(e.to_string()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    if files.is_empty() {
        return Ok(0);
    }

    let file = File::create(archive_path).map_err(|e| archive_err(e.to_string()))?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in &files {
        let name = entry_name(staging_dir, path)
            .ok_or_else(|| archive_err(format!("{} is outside the staging tree", path.display())))?;

        writer
            .start_file(name, options)
            .map_err(|e| archive_err(e.to_string()))?;
        let mut source = File::open(path).map_err(|e| archive_err(e.to_string()))?;
        io::copy(&mut source, &mut writer).map_err(|e| archive_err(e.to_string()))?;
    }

    writer.finish().map_err(|e| archive_err(e.to_string()))?;
    Ok(files.len())
}

/// Archive entry name: path relative to the staging root, `/`-separated.
fn entry_name(staging_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(staging_dir).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}
