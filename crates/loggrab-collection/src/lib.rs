//! # loggrab Collection
//!
//! Captures the part of remote log files written while a test ran.
//!
//! This crate provides:
//! - Server/subsystem/log configuration (`config`)
//! - Line-offset tracking at test start (`tracker`)
//! - Extraction of appended lines at test end (`extractor`)
//! - Packaging of the downloaded fragments into one zip (`archive`)
//! - The lifecycle driver tying them together (`grabber`)

pub mod archive;
pub mod commands;
pub mod config;
pub mod extractor;
pub mod grabber;
pub mod state_file;
pub mod tracker;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export main types
pub use archive::{assemble_archive, archive_name, STAGING_DIR_NAME};
pub use config::{LogPattern, ServerConfig, ServerLogsConfig, SubsystemConfig, Transport};
pub use grabber::LogGrabber;
pub use transport::{SessionFactory, TransportFactory};
pub use types::{
    ExtractedFragment, ExtractionReport, PreparedState, ServerLogs, SubsystemLogs, TrackedLog,
};
