use anyhow::{Context, Result};
use loggrab_common::SessionAlias;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod validation;

/// Top-level configuration: where remote temp files go and which logs to
/// watch on which servers.
///
/// ```yaml
/// tmpdir: /tmp
/// servers:
///   - hostname: server.example.com
///     port: 22
///     username: my_username
///     password: my_password
///     subsystems:
///       - name: Apache_server
///         logs:
///           - path_to_log: /var/log
///             log_name: access.log
///           - path_to_log: /var/log
///             log_name: "error*.log"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerLogsConfig {
    /// Directory for temporary files on the remote servers
    pub tmpdir: String,
    pub servers: Vec<ServerConfig>,
}

/// One server and the subsystems whose logs live on it
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub hostname: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub transport: Transport,
    #[serde(default)]
    pub subsystems: Vec<SubsystemConfig>,
}

impl ServerConfig {
    /// Alias of this server's session.
    pub fn alias(&self) -> SessionAlias {
        SessionAlias::for_endpoint(&self.username, &self.hostname, self.port)
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("transport", &self.transport)
            .field("subsystems", &self.subsystems)
            .finish()
    }
}

/// How commands reach the server
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// OpenSSH client
    #[default]
    Ssh,
    /// `sh -c` on the machine running loggrab
    Local,
}

/// A named service whose logs are tracked together
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubsystemConfig {
    pub name: String,
    #[serde(default)]
    pub logs: Vec<LogPattern>,
}

/// Directory plus file name glob (`find`-style wildcards)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogPattern {
    pub path_to_log: String,
    pub log_name: String,
}

impl ServerLogsConfig {
    /// Load configuration from a YAML (or JSON) file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::load_from_string(&content)
    }

    /// Load configuration from a YAML string
    pub fn load_from_string(content: &str) -> Result<Self> {
        let config: ServerLogsConfig = serde_yaml::from_str(content)
            .context("Failed to parse YAML configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Total number of log patterns across all servers
    pub fn pattern_count(&self) -> usize {
        self.servers
            .iter()
            .flat_map(|s| s.subsystems.iter())
            .map(|s| s.logs.len())
            .sum()
    }
}

fn default_port() -> u16 {
    22
}
