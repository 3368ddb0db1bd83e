//! Persisting tracked offsets between process invocations

use crate::types::PreparedState;
use loggrab_common::{GrabError, GrabResult};
use std::path::Path;

impl PreparedState {
    /// Save the state as pretty JSON (atomic write).
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> GrabResult<()> {
        let path = path.as_ref();
        let state_err = |reason: String| GrabError::state_file(path.display().to_string(), reason);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| state_err(format!("Failed to create directory {}: {}", parent.display(), e)))?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| state_err(format!("Failed to serialize state: {}", e)))?;

        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, json)
            .await
            .map_err(|e| state_err(format!("Failed to write state file: {}", e)))?;

        tokio::fs::rename(&temp_path, path)
            .await
            .map_err(|e| state_err(format!("Failed to rename state file: {}", e)))?;

        Ok(())
    }

    /// Load a state saved by [`PreparedState::save`].
    pub async fn load<P: AsRef<Path>>(path: P) -> GrabResult<Self> {
        let path = path.as_ref();
        let state_err = |reason: String| GrabError::state_file(path.display().to_string(), reason);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| state_err(format!("Failed to read state file: {}", e)))?;

        serde_json::from_str(&content).map_err(|e| state_err(format!("Failed to parse state file: {}", e)))
    }
}
