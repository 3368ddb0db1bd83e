//! Position of the running test inside the suite tree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The suite chain (outermost first) and, inside a test, the test name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestScope {
    pub suite_path: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_name: Option<String>,
}

impl TestScope {
    /// Scope of a suite, outside of any test.
    pub fn suite<I, S>(suite_path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suite_path: suite_path.into_iter().map(Into::into).collect(),
            test_name: None,
        }
    }

    /// Scope of a test inside the given suite chain.
    pub fn test<I, S>(suite_path: I, test_name: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suite_path: suite_path.into_iter().map(Into::into).collect(),
            test_name: Some(test_name.into()),
        }
    }

    /// Parse a `/`-separated suite chain such as `Top/Child`.
    ///
    /// Empty segments are dropped.
    pub fn parse_suite_path(path: &str) -> Vec<String> {
        path.split('/')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl fmt::Display for TestScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.suite_path.join("."))?;
        if let Some(test) = &self.test_name {
            write!(f, " / {}", test)?;
        }
        Ok(())
    }
}
