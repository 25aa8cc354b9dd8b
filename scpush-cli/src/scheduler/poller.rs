//! Job status poller
//!
//! Queries the controller's task resource until the import job reaches a
//! terminal status. Two retry budgets apply:
//! - Bad answers (unexpected status code, unreadable body) are retried up to
//!   `max_poll_retries` consecutive times
//! - A job that is still running is polled for as long as it takes, bounded
//!   only by the optional job timeout and the cancellation token

use scpush_client::{GatewayError, HttpGateway, HttpResponse, endpoints};
use scpush_core::domain::job::{Job, JobStatus};
use scpush_core::domain::status::classify;
use scpush_core::dto::task::TaskResource;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::time::{self, Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::Config;

/// Why polling stopped before the controller reported an outcome
#[derive(Debug, Error)]
pub enum PollError {
    #[error("Failed to query job status: {0}")]
    Transport(#[from] GatewayError),

    #[error("Job status unavailable after {attempts} attempts (last: {last})")]
    RetryExhausted { attempts: u32, last: String },

    #[error("Polling cancelled")]
    Cancelled,

    #[error("Job did not finish within {0:?}")]
    DeadlineExceeded(Duration),
}

/// A status answer that could not be used
#[derive(Debug)]
enum BadAnswer {
    Status(u16),
    Malformed(String),
}

impl std::fmt::Display for BadAnswer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BadAnswer::Status(code) => write!(f, "status {}", code),
            BadAnswer::Malformed(reason) => write!(f, "malformed body: {}", reason),
        }
    }
}

/// Polls one controller for the status of import jobs
pub struct StatusPoller {
    gateway: Arc<dyn HttpGateway>,
    interval: Duration,
    max_retries: u32,
    job_timeout: Option<Duration>,
}

impl StatusPoller {
    pub fn new(gateway: Arc<dyn HttpGateway>, config: &Config) -> Self {
        Self {
            gateway,
            interval: config.poll_interval,
            max_retries: config.max_poll_retries,
            job_timeout: config.job_timeout,
        }
    }

    /// Polls until `job` is terminal and returns it
    ///
    /// Failures are recorded on the job (status `Unknown`, `error` set)
    /// rather than returned.
    pub async fn poll(&self, mut job: Job, cancel: &CancellationToken) -> Job {
        let path = endpoints::task(&job.id);
        let deadline = self.job_timeout.map(|timeout| Instant::now() + timeout);
        let mut bad_answers = 0u32;

        info!("Polling status of job {}", job.id);

        loop {
            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => return self.stop(job, PollError::Cancelled),
                _ = Self::deadline(deadline) => return self.stop_on_deadline(job),
                response = self.gateway.get(&path) => response,
            };
            job.polls += 1;

            let response = match response {
                Ok(response) => response,
                Err(e) => return self.stop(job, PollError::Transport(e)),
            };

            match self.evaluate(&mut job, &response) {
                Ok(status) if status.is_terminal() => return job,
                Ok(_) => bad_answers = 0,
                Err(bad) => {
                    bad_answers += 1;
                    warn!(
                        "Unusable status answer for job {} ({}), attempt {}/{}",
                        job.id, bad, bad_answers, self.max_retries
                    );
                    if bad_answers > self.max_retries {
                        let err = PollError::RetryExhausted {
                            attempts: bad_answers,
                            last: bad.to_string(),
                        };
                        return self.stop(job, err);
                    }
                }
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return self.stop(job, PollError::Cancelled),
                _ = Self::deadline(deadline) => return self.stop_on_deadline(job),
                _ = time::sleep(self.interval) => {}
            }
        }
    }

    /// Classifies one status answer and updates the job
    fn evaluate(&self, job: &mut Job, response: &HttpResponse) -> Result<JobStatus, BadAnswer> {
        if !matches!(response.status, 200 | 202) {
            return Err(BadAnswer::Status(response.status));
        }

        let task: TaskResource = response
            .json()
            .map_err(|e| BadAnswer::Malformed(e.to_string()))?;

        let dell = &task.oem.dell;
        job.observe(dell.message.clone(), dell.percent());

        let status = classify(&dell.message);
        job.transition(status);

        match status {
            JobStatus::Failed => {
                error!(
                    "Job {} failed: {} (state: {})",
                    job.id,
                    dell.message,
                    dell.job_state.as_deref().unwrap_or("unknown")
                );
                log_job_details(&task, true);
            }
            JobStatus::RebootNeeded => {
                info!(
                    "Job {} completed; NoReboot requested, changes apply on the next manual reboot",
                    job.id
                );
                log_job_details(&task, false);
            }
            JobStatus::Completed => {
                info!(
                    "Job {} completed in {:?}: {}",
                    job.id,
                    job.completion_time.unwrap_or_default(),
                    dell.message
                );
                log_job_details(&task, false);
            }
            JobStatus::CompletedWithNoChange => {
                info!("Job {} completed without changes: {}", job.id, dell.message);
                log_job_details(&task, false);
            }
            JobStatus::Pending => match job.last_percent_complete {
                Some(percent) => info!(
                    "Job {} not finished: {} ({}% complete)",
                    job.id, dell.message, percent
                ),
                None => info!("Job {} not finished: {}", job.id, dell.message),
            },
            JobStatus::Unknown => {}
        }

        Ok(status)
    }

    fn stop(&self, mut job: Job, err: PollError) -> Job {
        match &err {
            PollError::Cancelled => warn!("Stopped polling job {}: {}", job.id, err),
            _ => error!("Stopped polling job {}: {}", job.id, err),
        }
        job.abort(err);
        job
    }

    fn stop_on_deadline(&self, job: Job) -> Job {
        let timeout = self.job_timeout.unwrap_or_default();
        self.stop(job, PollError::DeadlineExceeded(timeout))
    }

    /// Resolves at `deadline`, never when there is none
    async fn deadline(deadline: Option<Instant>) {
        match deadline {
            Some(at) => time::sleep_until(at).await,
            None => std::future::pending().await,
        }
    }
}

/// Logs the vendor job fields and per-attribute results
///
/// Failures are logged at warn level, other outcomes at info.
fn log_job_details(task: &TaskResource, failed: bool) {
    for line in detail_lines(task) {
        if failed {
            warn!("  {}", line);
        } else {
            info!("  {}", line);
        }
    }
}

/// One line per vendor job field, then one per attribute result
fn detail_lines(task: &TaskResource) -> Vec<String> {
    let fields = task
        .oem
        .dell
        .extra
        .iter()
        .map(|(key, value)| format!("{}: {}", key, render(value)));

    let results = task.attribute_results().map(|result| {
        result
            .iter()
            .map(|(key, value)| format!("{}={}", key, render(value)))
            .collect::<Vec<_>>()
            .join(", ")
    });

    fields.chain(results).collect()
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
