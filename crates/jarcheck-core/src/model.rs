use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TestStatus {
    #[default]
    Pending,
    Pass,
    Fail,
}

impl TestStatus {
    /// Pass and Fail count towards progress; Pending does not.
    pub fn is_resolved(&self) -> bool {
        matches!(self, TestStatus::Pass | TestStatus::Fail)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Pending => "Pending",
            TestStatus::Pass => "Pass",
            TestStatus::Fail => "Fail",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(TestStatus::Pending),
            "pass" => Ok(TestStatus::Pass),
            "fail" => Ok(TestStatus::Fail),
            other => Err(format!("unknown status `{other}` (expected pass, fail or pending)")),
        }
    }
}

/// One artifact under test. Serialized with the `file_name` key used by `output.json`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestRecord {
    #[serde(rename = "file_name")]
    pub artifact_name: String,
    pub status: TestStatus,
    pub notes: String,
}

impl TestRecord {
    pub fn pending(artifact_name: impl Into<String>) -> Self {
        Self {
            artifact_name: artifact_name.into(),
            status: TestStatus::Pending,
            notes: String::new(),
        }
    }
}
