//! # loggrab Remote
//!
//! Remote command execution for loggrab.
//!
//! This crate provides:
//! - The `RemoteExecutor` trait: run a shell command, download a file
//! - An OpenSSH control-master implementation (`SshExecutor`)
//! - A local implementation running the same commands through `sh -c`
//! - A keyed `SessionRegistry` with explicit open/switch/close
//!
//! `SshExecutor` shells out to the OpenSSH `ssh` and `scp` clients; servers
//! configured with a password additionally need `sshpass` on the local host.

pub mod executor;
pub mod local;
pub mod session;
pub mod ssh;

// Re-export main types
pub use executor::{CommandOutput, RemoteExecutor};
pub use local::LocalExecutor;
pub use session::SessionRegistry;
pub use ssh::{SshExecutor, SshTarget};
