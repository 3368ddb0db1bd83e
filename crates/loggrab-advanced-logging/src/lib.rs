//! # loggrab Advanced Logging
//!
//! Hierarchical directories for additional test logs:
//! `<output_dir>/<folder_name>/<suite>/<sub-suite>/.../<test>/`.
//!
//! Log grabbing only needs one thing from here, a base directory scoped to
//! the running suite or test, which is what `LogDirResolver` expresses.

pub mod resolver;
pub mod scope;

pub use resolver::{AdvancedLogging, LogDirResolver, DEFAULT_FOLDER_NAME};
pub use scope::TestScope;
