//! Advanced log directory hierarchy.
//!
//! Files and folders are never removed up front; writing a file that
//! already exists overwrites it.

use crate::scope::TestScope;
use async_trait::async_trait;
use loggrab_common::{GrabError, GrabResult};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Default name of the folder the hierarchy is built under.
pub const DEFAULT_FOLDER_NAME: &str = "Advanced_Logs";

/// Resolves (and creates) the local base directory for a suite or test.
#[async_trait]
pub trait LogDirResolver: Send + Sync {
    async fn resolve_log_dir(&self, scope: &TestScope) -> GrabResult<PathBuf>;
}

/// Builds `<output_dir>/<folder_name>/<suite>/.../<test>` directories.
#[derive(Debug, Clone)]
pub struct AdvancedLogging {
    output_dir: PathBuf,
    folder_name: String,
}

impl AdvancedLogging {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            folder_name: DEFAULT_FOLDER_NAME.to_string(),
        }
    }

    pub fn with_folder_name(mut self, folder_name: impl Into<String>) -> Self {
        self.folder_name = folder_name.into();
        self
    }

    /// `<output_dir>/<folder_name>/<suite>/<sub-suite>/...`
    pub fn suite_folder(&self, scope: &TestScope) -> PathBuf {
        let mut folder = self.output_dir.join(&self.folder_name);
        for suite in &scope.suite_path {
            folder.push(sanitize_segment(suite));
        }
        folder
    }

    /// The suite folder, or the test's folder inside it when in a test.
    pub fn log_folder(&self, scope: &TestScope) -> PathBuf {
        let folder = self.suite_folder(scope);
        match &scope.test_name {
            Some(test) => folder.join(sanitize_segment(test)),
            None => folder,
        }
    }

    /// Create the folder hierarchy for the scope and return its path.
    pub async fn create_advanced_logdir(&self, scope: &TestScope) -> GrabResult<PathBuf> {
        let folder = self.log_folder(scope);
        tokio::fs::create_dir_all(&folder)
            .await
            .map_err(|e| GrabError::log_directory(folder.display().to_string(), e.to_string()))?;

        debug!(scope = %scope, path = %folder.display(), "Advanced log directory ready");
        Ok(folder)
    }

    /// Write `content` to `filename` inside the scope's folder, replacing
    /// any previous content. Returns the path of the file.
    pub async fn write_advanced_testlog(
        &self,
        scope: &TestScope,
        filename: &str,
        content: &str,
    ) -> GrabResult<PathBuf> {
        let relative = Path::new(filename);
        let is_plain_relative = relative.components().next().is_some()
            && relative.components().all(|c| matches!(c, Component::Normal(_)));
        if !is_plain_relative {
            return Err(GrabError::log_directory(
                filename,
                "file name must be a relative path without '..'",
            ));
        }

        let path = self.log_folder(scope).join(relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| GrabError::log_directory(parent.display().to_string(), e.to_string()))?;
        }

        tokio::fs::write(&path, content)
            .await
            .map_err(|e| GrabError::log_directory(path.display().to_string(), e.to_string()))?;

        Ok(path)
    }
}

#[async_trait]
impl LogDirResolver for AdvancedLogging {
    async fn resolve_log_dir(&self, scope: &TestScope) -> GrabResult<PathBuf> {
        self.create_advanced_logdir(scope).await
    }
}

/// Keep suite and test names from escaping their slot in the hierarchy.
fn sanitize_segment(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();

    match cleaned.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => cleaned,
    }
}
