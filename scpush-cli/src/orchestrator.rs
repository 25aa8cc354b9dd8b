//! Import orchestration
//!
//! Runs one import against one controller: load the profile, submit it,
//! poll the resulting job and report the outcome. Every run reports exactly
//! once, whatever stage it stopped at.

use scpush_client::HttpGateway;
use scpush_core::domain::job::{Job, JobId};
use scpush_core::domain::submission::{
    HostPowerState, JobSubmission, ShutdownType, Target, ValidationError,
};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, error, info_span};

use crate::config::Config;
use crate::loader::{self, LoadError};
use crate::scheduler::StatusPoller;
use crate::service::{ResultReporter, SubmissionClient, SubmitError};

/// What to import and how
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub config_path: PathBuf,
    pub target: Target,
    pub shutdown_type: Option<ShutdownType>,
    pub end_power_state: Option<HostPowerState>,
}

/// Failures that end a run before a job exists
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

/// Final result of one run
#[derive(Debug)]
pub enum Outcome {
    /// A job was created and polled to a terminal status
    Finished(Job),
    /// The run stopped before the controller created a job
    Aborted(ImportError),
}

impl Outcome {
    pub fn job_id(&self) -> Option<&JobId> {
        match self {
            Outcome::Finished(job) => Some(&job.id),
            Outcome::Aborted(_) => None,
        }
    }

    /// Short status name used in the results file
    pub fn status_label(&self) -> String {
        match self {
            Outcome::Finished(job) => job.status.to_string(),
            Outcome::Aborted(ImportError::Load(LoadError::NotFound { .. })) => {
                "ConfigNotFound".to_string()
            }
            Outcome::Aborted(ImportError::Load(_)) => "ConfigUnreadable".to_string(),
            Outcome::Aborted(ImportError::Validation(_)) => "InvalidSubmission".to_string(),
            Outcome::Aborted(ImportError::Submit(err)) => match err {
                SubmitError::Transport(_) => "TransportError",
                SubmitError::SubmissionFailed { .. } => "SubmissionFailed",
                SubmitError::JobIdMissing { .. } => "JobIdMissing",
                SubmitError::Encode(_) => "InvalidSubmission",
            }
            .to_string(),
        }
    }

    /// Whether the controller reported an outcome for the job
    ///
    /// Drives the process exit code.
    pub fn is_success(&self) -> bool {
        match self {
            Outcome::Finished(job) => job.status.is_resolved(),
            Outcome::Aborted(_) => false,
        }
    }
}

/// Runs imports against one controller
pub struct Orchestrator {
    gateway: Arc<dyn HttpGateway>,
    reporter: Arc<dyn ResultReporter>,
    config: Config,
}

impl Orchestrator {
    pub fn new(
        gateway: Arc<dyn HttpGateway>,
        reporter: Arc<dyn ResultReporter>,
        config: Config,
    ) -> Self {
        Self {
            gateway,
            reporter,
            config,
        }
    }

    /// Base URL of the controller this orchestrator targets
    pub fn source_url(&self) -> &str {
        self.gateway.base_url()
    }

    /// Runs the import and reports its outcome
    pub async fn run(&self, request: &ImportRequest, cancel: CancellationToken) -> Outcome {
        let span = info_span!("import", controller = %self.source_url());

        async {
            let outcome = self.execute(request, &cancel).await;

            if let Err(e) = self.reporter.report(self.source_url(), &outcome).await {
                error!("Failed to record result: {}", e);
            }

            outcome
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, request: &ImportRequest, cancel: &CancellationToken) -> Outcome {
        let job = match self.submit(request).await {
            Ok(job) => job,
            Err(e) => {
                error!("Import aborted: {}", e);
                return Outcome::Aborted(e);
            }
        };

        let poller = StatusPoller::new(Arc::clone(&self.gateway), &self.config);
        Outcome::Finished(poller.poll(job, cancel).await)
    }

    async fn submit(&self, request: &ImportRequest) -> Result<Job, ImportError> {
        let payload = loader::load(&request.config_path).await?;
        let submission = JobSubmission::new(
            request.target,
            request.shutdown_type,
            request.end_power_state,
            payload,
        )?;

        let client = SubmissionClient::new(Arc::clone(&self.gateway));
        Ok(client.submit(&submission).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedGateway, accepted};
    use async_trait::async_trait;
    use scpush_client::HttpResponse;
    use scpush_core::domain::job::JobStatus;
    use serde_json::Value;
    use std::io::{self, Write};
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    #[derive(Default)]
    struct RecordingReporter {
        lines: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ResultReporter for RecordingReporter {
        async fn report(&self, source_url: &str, outcome: &Outcome) -> io::Result<()> {
            self.lines.lock().unwrap().push(format!(
                "{} {} {}",
                source_url,
                outcome.job_id().map(|id| id.as_str()).unwrap_or("-"),
                outcome.status_label()
            ));
            Ok(())
        }
    }

    fn profile(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn request(path: PathBuf) -> ImportRequest {
        ImportRequest {
            config_path: path,
            target: Target::Bios,
            shutdown_type: Some(ShutdownType::Forced),
            end_power_state: None,
        }
    }

    fn config() -> Config {
        Config {
            poll_interval: Duration::ZERO,
            ..Config::default()
        }
    }

    async fn run(
        gateway: ScriptedGateway,
        request: &ImportRequest,
    ) -> (Arc<ScriptedGateway>, Arc<RecordingReporter>, Outcome) {
        let gateway = Arc::new(gateway);
        let reporter = Arc::new(RecordingReporter::default());
        let orchestrator = Orchestrator::new(gateway.clone(), reporter.clone(), config());
        let outcome = orchestrator.run(request, CancellationToken::new()).await;
        (gateway, reporter, outcome)
    }

    #[tokio::test]
    async fn test_end_to_end_import() {
        let file = profile("  <SystemConfiguration>\n  <Component FQDD=\"BIOS.Setup.1-1\">\n  </Component>\n</SystemConfiguration>\n");
        let gateway = ScriptedGateway::new()
            .on_post(Ok(HttpResponse::new(202, "{\"@Message.ExtendedInfo\":\"Task JID_999 created\"}")))
            .then_message("Configuring: 40% complete", Some(40))
            .then_message("Successfully imported and applied Server Configuration Profile.", Some(100));

        let (gateway, reporter, outcome) = run(gateway, &request(file.path().to_path_buf())).await;

        let requests = gateway.requests();
        let body: Value = serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body["ImportBuffer"],
            "<SystemConfiguration><ComponentFQDD=\"BIOS.Setup.1-1\"></Component></SystemConfiguration>"
        );
        assert_eq!(body["ShareParameters"]["Target"], "BIOS");
        assert_eq!(body["ShutdownType"], "Forced");
        assert!(body.get("HostPowerState").is_none());

        let Outcome::Finished(job) = &outcome else {
            panic!("expected a finished job, got {:?}", outcome);
        };
        assert_eq!(job.id.as_str(), "JID_999");
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.polls, 2);
        assert!(job.completion_time.is_some());
        assert!(outcome.is_success());

        assert_eq!(
            *reporter.lines.lock().unwrap(),
            vec!["https://idrac.test JID_999 Completed".to_string()]
        );
    }

    #[tokio::test]
    async fn test_missing_profile_reports_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let request = request(dir.path().join("missing.xml"));

        let (gateway, reporter, outcome) = run(ScriptedGateway::new(), &request).await;

        assert!(gateway.requests().is_empty());
        assert_eq!(outcome.status_label(), "ConfigNotFound");
        assert!(!outcome.is_success());
        assert_eq!(
            *reporter.lines.lock().unwrap(),
            vec!["https://idrac.test - ConfigNotFound".to_string()]
        );
    }

    #[tokio::test]
    async fn test_missing_job_id_skips_polling() {
        let file = profile("<SystemConfiguration/>");
        let gateway = ScriptedGateway::new()
            .on_post(Ok(HttpResponse::new(202, "{}")))
            .then_message("Successfully imported", None);

        let (gateway, reporter, outcome) = run(gateway, &request(file.path().to_path_buf())).await;

        assert_eq!(gateway.get_count(), 0);
        assert_eq!(outcome.status_label(), "JobIdMissing");
        assert_eq!(reporter.lines.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_submission() {
        let file = profile("<SystemConfiguration/>");
        let gateway = ScriptedGateway::new().on_post(Ok(HttpResponse::new(401, "Unauthorized")));

        let (gateway, reporter, outcome) = run(gateway, &request(file.path().to_path_buf())).await;

        assert_eq!(gateway.get_count(), 0);
        assert_eq!(outcome.status_label(), "SubmissionFailed");
        assert!(!outcome.is_success());
        assert_eq!(reporter.lines.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_classified_failure_is_a_resolved_outcome() {
        let file = profile("<SystemConfiguration/>");
        let gateway = ScriptedGateway::new()
            .on_post(Ok(accepted("JID_7")))
            .then_message("Unable to apply the configuration", None);

        let (_, reporter, outcome) = run(gateway, &request(file.path().to_path_buf())).await;

        assert_eq!(outcome.status_label(), "Failed");
        assert!(outcome.is_success());
        assert_eq!(
            *reporter.lines.lock().unwrap(),
            vec!["https://idrac.test JID_7 Failed".to_string()]
        );
    }

    #[tokio::test]
    async fn test_poll_transport_error_is_unknown() {
        let file = profile("<SystemConfiguration/>");
        let gateway = ScriptedGateway::new().on_post(Ok(accepted("JID_8")));

        let (_, reporter, outcome) = run(gateway, &request(file.path().to_path_buf())).await;

        assert_eq!(outcome.status_label(), "Unknown");
        assert!(!outcome.is_success());
        assert_eq!(
            *reporter.lines.lock().unwrap(),
            vec!["https://idrac.test JID_8 Unknown".to_string()]
        );
    }
}
