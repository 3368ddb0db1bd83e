//! Opening sessions to configured servers

use crate::config::{ServerConfig, Transport};
use async_trait::async_trait;
use loggrab_common::GrabResult;
use loggrab_remote::{LocalExecutor, RemoteExecutor, SshExecutor, SshTarget};

/// Connects a configured server to an executor.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn connect(&self, server: &ServerConfig) -> GrabResult<Box<dyn RemoteExecutor>>;
}

/// Picks the executor from the server's `transport` setting.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransportFactory;

#[async_trait]
impl SessionFactory for TransportFactory {
    async fn connect(&self, server: &ServerConfig) -> GrabResult<Box<dyn RemoteExecutor>> {
        match server.transport {
            Transport::Ssh => {
                let target = SshTarget {
                    hostname: server.hostname.clone(),
                    port: server.port,
                    username: server.username.clone(),
                    password: server.password.clone(),
                };
                Ok(Box::new(SshExecutor::open(target).await?))
            }
            Transport::Local => Ok(Box::new(LocalExecutor::with_host(&server.hostname))),
        }
    }
}
