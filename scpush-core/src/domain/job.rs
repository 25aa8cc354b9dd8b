//! Job domain types

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use std::time::{Duration, Instant};

static JOB_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"JID_[0-9]+").expect("job id pattern is valid"));

/// Controller-assigned job identifier of the form `JID_<digits>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);

impl JobId {
    /// Parses a string that is exactly a job identifier
    pub fn parse(s: &str) -> Option<Self> {
        JOB_ID_PATTERN
            .find(s)
            .filter(|m| m.start() == 0 && m.end() == s.len())
            .map(|m| JobId(m.as_str().to_string()))
    }

    /// Finds the first job identifier embedded anywhere in `text`
    ///
    /// Works on values such as `/redfish/v1/TaskService/Tasks/JID_123` or a
    /// raw response body.
    pub fn find_in(text: &str) -> Option<Self> {
        JOB_ID_PATTERN
            .find(text)
            .map(|m| JobId(m.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for JobId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        JobId::parse(&value).ok_or_else(|| format!("invalid job id: {}", value))
    }
}

impl From<JobId> for String {
    fn from(id: JobId) -> Self {
        id.0
    }
}

/// Job status as seen by the poller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Still running on the controller
    Pending,
    Completed,
    CompletedWithNoChange,
    /// Accepted, applied only after a manual reboot
    RebootNeeded,
    Failed,
    /// Polling gave up before the controller reported an outcome
    Unknown,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending)
    }

    /// Whether the controller reported an outcome for the job
    ///
    /// `Failed` counts: the job finished, it just did not apply cleanly.
    pub fn is_resolved(&self) -> bool {
        self.is_terminal() && !matches!(self, JobStatus::Unknown)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "Pending"),
            JobStatus::Completed => write!(f, "Completed"),
            JobStatus::CompletedWithNoChange => write!(f, "CompletedWithNoChange"),
            JobStatus::RebootNeeded => write!(f, "RebootNeeded"),
            JobStatus::Failed => write!(f, "Failed"),
            JobStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Import job record
///
/// Created once the controller accepts a submission and then owned by the
/// poller until it reaches a terminal status.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    /// Monotonic start, used for the completion time
    pub start_time: Instant,
    /// Wall clock at submission, written to the results file
    pub submitted_at: DateTime<Utc>,
    pub status: JobStatus,
    pub completion_time: Option<Duration>,
    pub last_message: String,
    pub last_percent_complete: Option<u32>,
    /// Number of status queries issued
    pub polls: u32,
    /// Why polling stopped without an outcome
    pub error: Option<String>,
}

impl Job {
    pub fn new(id: JobId) -> Self {
        Self {
            id,
            start_time: Instant::now(),
            submitted_at: Utc::now(),
            status: JobStatus::Pending,
            completion_time: None,
            last_message: String::new(),
            last_percent_complete: None,
            polls: 0,
            error: None,
        }
    }

    /// Stores the latest message reported by the controller
    pub fn observe(&mut self, message: impl Into<String>, percent_complete: Option<u32>) {
        self.last_message = message.into();
        if percent_complete.is_some() {
            self.last_percent_complete = percent_complete;
        }
    }

    /// Moves the job to `status`, stamping the completion time on success
    pub fn transition(&mut self, status: JobStatus) {
        self.status = status;
        if status == JobStatus::Completed {
            self.completion_time = Some(self.start_time.elapsed());
        }
    }

    /// Ends the job without an outcome
    pub fn abort(&mut self, reason: impl fmt::Display) {
        self.status = JobStatus::Unknown;
        self.error = Some(reason.to_string());
    }
}
