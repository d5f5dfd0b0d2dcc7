use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Local clock, second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Contact form fields exactly as the visitor posted them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// A submission whose fields are trimmed and passed validation.
/// Only `validation::validate_submission` constructs one.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    name: String,
    email: String,
    message: String,
}

impl NewSubmission {
    pub(super) fn new(name: String, email: String, message: String) -> Self {
        Self {
            name,
            email,
            message,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// One entry of the durable message record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    pub timestamp: String,
    /// Reserved for an external admin view; always written as false here.
    #[serde(default)]
    pub read: bool,
}

impl StoredSubmission {
    pub fn stamped(submission: &NewSubmission, at: DateTime<Local>) -> Self {
        Self {
            name: submission.name().to_string(),
            email: submission.email().to_string(),
            message: submission.message().to_string(),
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            read: false,
        }
    }
}
