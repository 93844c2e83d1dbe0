use serde::{Deserialize, Serialize};

pub const FETCH_JOBS_FAILED: &str = "Failed to fetch jobs. Please try again later.";
pub const DELETE_SUCCEEDED: &str = "Job deleted successfully!";
pub const DELETE_FAILED: &str = "Failed to delete job. Please try again.";
pub const CREATE_SUCCEEDED: &str = "Job created successfully!";
pub const CREATE_FAILED: &str = "Failed to create job. Please try again.";
pub const FETCH_DETAILS_FAILED: &str = "Failed to fetch job details. Please try again later.";
pub const FETCH_HISTORY_FAILED: &str = "Failed to fetch job history. Please try again later.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// User-visible outcome of one operation. The latest one replaces any earlier one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn success(message: &str) -> Self {
        Self {
            severity: Severity::Success,
            message: message.to_string(),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            severity: Severity::Error,
            message: message.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
