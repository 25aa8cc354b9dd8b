//! Status message classification
//!
//! The controller reports job progress as free text. Messages are matched
//! against ordered, case-sensitive substring lists; the first category that
//! matches wins, so a message such as "completed with errors" is a failure
//! even though it also reads like a completion.

use crate::domain::job::JobStatus;

/// Messages signalling that the import did not apply cleanly
pub const FAILED_PATTERNS: &[&str] = &[
    "failed",
    "completed with errors",
    "Not one",
    "not compliant",
    "Unable",
    "The system could not be shut down",
    "No device configuration",
];

/// Import accepted but staged until the next manual reboot
pub const REBOOT_NEEDED_PATTERNS: &[&str] = &["No reboot Server"];

pub const COMPLETED_PATTERNS: &[&str] = &["Successfully imported"];

pub const NO_CHANGE_PATTERNS: &[&str] = &["No changes", "No configuration changes"];

/// Category lists in evaluation order
const RULES: [(&[&str], JobStatus); 4] = [
    (FAILED_PATTERNS, JobStatus::Failed),
    (REBOOT_NEEDED_PATTERNS, JobStatus::RebootNeeded),
    (COMPLETED_PATTERNS, JobStatus::Completed),
    (NO_CHANGE_PATTERNS, JobStatus::CompletedWithNoChange),
];

/// Maps a controller status message onto a job status
///
/// Returns [`JobStatus::Pending`] when no category matches.
pub fn classify(message: &str) -> JobStatus {
    RULES
        .iter()
        .find(|(patterns, _)| patterns.iter().any(|p| message.contains(p)))
        .map(|(_, status)| *status)
        .unwrap_or(JobStatus::Pending)
}
