//! # loggrab Common
//!
//! Common types and errors shared across the loggrab crates.
//!
//! This crate provides the foundational pieces every other crate builds
//! upon: the `GrabError` type, session aliases and test outcome types.

pub mod errors;
pub mod types;

// Re-export commonly used items
pub use errors::{GrabError, GrabResult};
pub use types::{CollectPolicy, SessionAlias, TestStatus};
