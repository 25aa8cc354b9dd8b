//! Console output
//!
//! One colored summary line per controller once its import has finished.

use colored::*;
use scpush_core::domain::job::JobStatus;

use crate::orchestrator::Outcome;

/// Print the summary for one controller
pub fn print_outcome(source_url: &str, outcome: &Outcome) {
    let job_id = outcome
        .job_id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());

    println!(
        "  {} {} job {} {}",
        "▸".cyan(),
        source_url.bold(),
        job_id.dimmed(),
        colorize_outcome(outcome)
    );

    match outcome {
        Outcome::Finished(job) => {
            println!(
                "    Submitted at: {}",
                job.submitted_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            if let Some(elapsed) = job.completion_time {
                println!("    Completed in: {}s", elapsed.as_secs());
            }
            if job.status == JobStatus::RebootNeeded {
                println!(
                    "    {}",
                    "Changes apply on the next manual server reboot".yellow()
                );
            }
            if !job.last_message.is_empty() {
                println!("    Message:      {}", job.last_message);
            }
            if let Some(error) = &job.error {
                println!("    Error:        {}", error.red());
            }
        }
        Outcome::Aborted(error) => {
            println!("    Error:        {}", error.to_string().red());
        }
    }
}

/// Colorize the outcome label for display
fn colorize_outcome(outcome: &Outcome) -> ColoredString {
    let label = outcome.status_label();
    match outcome {
        Outcome::Finished(job) => match job.status {
            JobStatus::Completed | JobStatus::CompletedWithNoChange => label.green(),
            JobStatus::RebootNeeded => label.yellow(),
            JobStatus::Pending => label.cyan(),
            JobStatus::Failed | JobStatus::Unknown => label.red(),
        },
        Outcome::Aborted(_) => label.red(),
    }
}
