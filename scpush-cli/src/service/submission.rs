//! Submission service
//!
//! Posts the import action and turns the controller's answer into a [`Job`]:
//! - Builds the JSON body from a [`JobSubmission`]
//! - Rejects transport failures and non-2xx answers without retrying
//! - Extracts the job identifier the controller assigned

use scpush_client::{GatewayError, HttpGateway, HttpResponse, endpoints};
use scpush_core::domain::job::{Job, JobId};
use scpush_core::domain::submission::JobSubmission;
use scpush_core::dto::import::ImportSystemConfiguration;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Why a submission did not produce a job
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Failed to reach controller: {0}")]
    Transport(#[from] GatewayError),

    #[error("Import request rejected (status {status}): {body}")]
    SubmissionFailed { status: u16, body: String },

    #[error("Import accepted (status {status}) but no job id was returned: {body}")]
    JobIdMissing { status: u16, body: String },

    #[error("Failed to encode import request: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Submits configuration imports to one controller
pub struct SubmissionClient {
    gateway: Arc<dyn HttpGateway>,
}

impl SubmissionClient {
    pub fn new(gateway: Arc<dyn HttpGateway>) -> Self {
        Self { gateway }
    }

    /// Posts the import action and returns the created job
    ///
    /// The job's start time is taken once the controller has accepted it.
    pub async fn submit(&self, submission: &JobSubmission) -> Result<Job, SubmitError> {
        let body = serde_json::to_string(&ImportSystemConfiguration::from(submission))?;

        info!(
            "Submitting {} configuration import to {}",
            submission.target(),
            self.gateway.base_url()
        );

        let response = self
            .gateway
            .post(
                endpoints::IMPORT_SYSTEM_CONFIGURATION,
                body,
                &[("content-type", "application/json")],
            )
            .await
            .inspect_err(|e| error!("Import request failed: {}", e))?;

        if !response.is_success() {
            error!("Import request rejected with status {}", response.status);
            return Err(SubmitError::SubmissionFailed {
                status: response.status,
                body: response.body,
            });
        }

        if response.status != 202 {
            warn!(
                "Import request returned status {}, expected 202",
                response.status
            );
        }

        let Some(job_id) = extract_job_id(&response) else {
            error!(
                "No job id found in import response (status {})",
                response.status
            );
            return Err(SubmitError::JobIdMissing {
                status: response.status,
                body: response.body,
            });
        };

        info!(
            "Job {} created for import (status {})",
            job_id, response.status
        );

        Ok(Job::new(job_id))
    }
}

/// Finds the job identifier in an import response
///
/// Looks at the `Location` header and the body's `Id` first, then searches
/// every header value and the raw body for a `JID_<digits>` token.
pub fn extract_job_id(response: &HttpResponse) -> Option<JobId> {
    if let Some(id) = response.header("location").and_then(JobId::find_in) {
        return Some(id);
    }

    if let Some(id) = response
        .json::<Value>()
        .ok()
        .as_ref()
        .and_then(|body| body.get("Id"))
        .and_then(Value::as_str)
        .and_then(JobId::parse)
    {
        return Some(id);
    }

    response
        .headers
        .iter()
        .find_map(|(_, value)| JobId::find_in(value))
        .or_else(|| JobId::find_in(&response.body))
}
