use super::*;
use anyhow::{anyhow, Result};
use std::collections::HashSet;

/// Validate the complete configuration
pub fn validate_config(config: &ServerLogsConfig) -> Result<()> {
    if config.tmpdir.trim().is_empty() {
        return Err(anyhow!("tmpdir cannot be empty"));
    }

    if !config.tmpdir.starts_with('/') {
        return Err(anyhow!("tmpdir must be an absolute path, got: {}", config.tmpdir));
    }

    validate_servers(&config.servers)
}

/// Validate all server configurations
fn validate_servers(servers: &[ServerConfig]) -> Result<()> {
    if servers.is_empty() {
        return Err(anyhow!("At least one server must be configured"));
    }

    // Sessions are keyed by alias, so two servers must not share one
    let mut aliases = HashSet::new();
    for server in servers {
        validate_server(server)?;

        let alias = server.alias();
        if !aliases.insert(alias.clone()) {
            return Err(anyhow!("Duplicate server: {}", alias));
        }
    }

    Ok(())
}

/// Validate a single server configuration
fn validate_server(server: &ServerConfig) -> Result<()> {
    if server.hostname.trim().is_empty() {
        return Err(anyhow!("Server hostname cannot be empty"));
    }

    if server.port == 0 {
        return Err(anyhow!("Port must be between 1 and 65535 for server {}", server.hostname));
    }

    if server.transport == Transport::Ssh && server.username.trim().is_empty() {
        return Err(anyhow!("Username is required for ssh server {}", server.hostname));
    }

    let mut names = HashSet::new();
    for subsystem in &server.subsystems {
        if subsystem.name.trim().is_empty() {
            return Err(anyhow!("Subsystem name cannot be empty on server {}", server.hostname));
        }

        if !names.insert(subsystem.name.as_str()) {
            return Err(anyhow!(
                "Duplicate subsystem name on server {}: {}",
                server.hostname,
                subsystem.name
            ));
        }

        for pattern in &subsystem.logs {
            validate_log_pattern(&subsystem.name, pattern)?;
        }
    }

    Ok(())
}

/// Validate one log pattern
fn validate_log_pattern(subsystem: &str, pattern: &LogPattern) -> Result<()> {
    if pattern.path_to_log.trim().is_empty() {
        return Err(anyhow!("path_to_log cannot be empty in subsystem {}", subsystem));
    }

    if pattern.log_name.trim().is_empty() {
        return Err(anyhow!("log_name cannot be empty in subsystem {}", subsystem));
    }

    if pattern.log_name.contains('/') {
        return Err(anyhow!(
            "log_name must be a file name pattern, not a path, in subsystem {}: {}",
            subsystem,
            pattern.log_name
        ));
    }

    if pattern.log_name.chars().any(char::is_control) {
        return Err(anyhow!(
            "log_name must not contain control characters in subsystem {}: {:?}",
            subsystem,
            pattern.log_name
        ));
    }

    Ok(())
}
