//! Tracking state and extraction results

use loggrab_common::SessionAlias;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A remote log file and its line count when tracking ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedLog {
    /// Directory holding the file on the remote host
    pub directory: String,
    /// Concrete file name the pattern resolved to
    pub name: String,
    pub line_count: u64,
}

impl TrackedLog {
    /// Absolute remote path of the file
    pub fn remote_path(&self) -> String {
        crate::commands::join_remote(&self.directory, &self.name)
    }
}

/// Tracked logs of one subsystem, in pattern order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsystemLogs {
    pub name: String,
    pub logs: Vec<TrackedLog>,
}

/// Tracked subsystems of one server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerLogs {
    pub alias: SessionAlias,
    pub hostname: String,
    pub subsystems: Vec<SubsystemLogs>,
}

impl ServerLogs {
    pub fn subsystem(&self, name: &str) -> Option<&SubsystemLogs> {
        self.subsystems.iter().find(|s| s.name == name)
    }
}

/// Everything recorded by the last tracking cycle: server -> subsystem ->
/// logs. Servers and subsystems without any tracked log are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedState {
    pub servers: Vec<ServerLogs>,
}

impl PreparedState {
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn server(&self, alias: &SessionAlias) -> Option<&ServerLogs> {
        self.servers.iter().find(|s| &s.alias == alias)
    }

    pub fn subsystem(&self, alias: &SessionAlias, name: &str) -> Option<&SubsystemLogs> {
        self.server(alias).and_then(|s| s.subsystem(name))
    }

    /// Number of tracked files across all servers
    pub fn log_count(&self) -> usize {
        self.servers
            .iter()
            .flat_map(|s| s.subsystems.iter())
            .map(|s| s.logs.len())
            .sum()
    }
}

/// One downloaded fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFragment {
    pub alias: SessionAlias,
    pub subsystem: String,
    pub log_name: String,
    /// First extracted line (1-based, inclusive)
    pub first_line: u64,
    /// Line count at extraction time
    pub last_line: u64,
    /// Where the compressed fragment was staged locally
    pub local_path: PathBuf,
}

impl ExtractedFragment {
    pub fn line_count(&self) -> u64 {
        self.last_line + 1 - self.first_line
    }
}

/// Result of one extraction run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Epoch seconds shared by every file name of this run
    pub timestamp: i64,
    pub fragments: Vec<ExtractedFragment>,
    /// The packaged archive, when anything was extracted
    pub archive: Option<PathBuf>,
}
