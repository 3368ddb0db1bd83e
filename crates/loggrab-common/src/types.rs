//! Core domain types used throughout loggrab.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Session alias - names one open remote session.
///
/// # Example
/// ```
/// use loggrab_common::SessionAlias;
///
/// let alias = SessionAlias::for_endpoint("deploy", "app-1.example.com", 22);
/// assert_eq!(alias.as_str(), "deploy@app-1.example.com:22");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionAlias(String);

impl SessionAlias {
    /// Builds the alias used for a server endpoint: `username@hostname:port`.
    pub fn for_endpoint(username: &str, hostname: &str, port: u16) -> Self {
        Self(format!("{}@{}:{}", username, hostname, port))
    }

    /// Returns the alias as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionAlias {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SessionAlias {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for SessionAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Final status of a test as reported by the test runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestStatus {
    Pass,
    Fail,
    Skip,
}

impl TestStatus {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestStatus::Pass)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Pass => write!(f, "PASS"),
            TestStatus::Fail => write!(f, "FAIL"),
            TestStatus::Skip => write!(f, "SKIP"),
        }
    }
}

impl FromStr for TestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PASS" => Ok(TestStatus::Pass),
            "FAIL" => Ok(TestStatus::Fail),
            "SKIP" => Ok(TestStatus::Skip),
            _ => Err(format!("Invalid test status: {}, must be one of: PASS, FAIL, SKIP", s)),
        }
    }
}

/// When logs are collected at the end of a test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectPolicy {
    /// Collect after every test.
    Always,
    /// Collect only after tests that did not pass.
    #[default]
    OnFailure,
}

impl CollectPolicy {
    /// Whether a test that ended with `status` gets its logs collected.
    pub fn should_collect(&self, status: TestStatus) -> bool {
        match self {
            CollectPolicy::Always => true,
            CollectPolicy::OnFailure => !status.is_pass(),
        }
    }
}

impl fmt::Display for CollectPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectPolicy::Always => write!(f, "always"),
            CollectPolicy::OnFailure => write!(f, "on-failure"),
        }
    }
}

impl FromStr for CollectPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "always" => Ok(CollectPolicy::Always),
            "on-failure" => Ok(CollectPolicy::OnFailure),
            _ => Err(format!("Invalid collect policy: {}, must be one of: always, on-failure", s)),
        }
    }
}
