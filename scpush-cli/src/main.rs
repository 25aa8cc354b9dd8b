//! scpush CLI
//!
//! Imports a Server Configuration Profile into one or more iDRAC controllers
//! through the Redfish API and waits for each import job to finish.
//!
//! Architecture:
//! - Configuration: Tunables from flags or `SCPUSH_*` environment variables
//! - Loader: Reads and normalizes the profile
//! - Services: Import submission and result reporting
//! - Scheduler: Job status polling
//! - Orchestrator: One import per controller, each in its own task

mod config;
mod display;
mod loader;
mod orchestrator;
mod scheduler;
mod service;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use clap::Parser;
use scpush_client::{Credentials, HttpGateway, RedfishGateway, endpoints};
use scpush_core::domain::submission::{HostPowerState, ShutdownType, Target};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::orchestrator::{ImportRequest, Orchestrator};
use crate::service::{ResultReporter, TsvReporter};

#[derive(Parser)]
#[command(name = "scpush")]
#[command(
    about = "Import a Server Configuration Profile into iDRAC controllers using the Redfish API",
    long_about = None
)]
struct Cli {
    /// iDRAC address; repeat or comma-separate to import into several controllers
    #[arg(
        short = 'i',
        long = "ip",
        env = "SCPUSH_IP",
        value_delimiter = ',',
        required = true
    )]
    ips: Vec<String>,

    /// iDRAC username
    #[arg(short, long, env = "SCPUSH_USERNAME")]
    username: String,

    /// iDRAC password
    #[arg(short, long, env = "SCPUSH_PASSWORD", hide_env_values = true)]
    password: String,

    /// Components to apply: ALL, System, BIOS, IDRAC, NIC, FC, LifecycleController or RAID
    #[arg(short, long, env = "SCPUSH_TARGET")]
    target: Target,

    /// Graceful, Forced or NoReboot (NoReboot defers changes to the next manual reboot)
    #[arg(short, long, env = "SCPUSH_SHUTDOWN")]
    shutdown: Option<ShutdownType>,

    /// Server Configuration Profile to import
    #[arg(short, long, env = "SCPUSH_FILENAME")]
    filename: PathBuf,

    /// Host power state once the import finishes: On or Off
    #[arg(short, long = "end-state", env = "SCPUSH_END_STATE")]
    end_state: Option<HostPowerState>,

    /// Tab-separated results file
    #[arg(short, long, env = "SCPUSH_OUTPUT", default_value = "status.txt")]
    output: PathBuf,

    /// Seconds between job status queries
    #[arg(long, env = "SCPUSH_POLL_INTERVAL", default_value_t = 10)]
    poll_interval: u64,

    /// Consecutive failed status queries tolerated per job
    #[arg(long, env = "SCPUSH_MAX_POLL_RETRIES", default_value_t = 10)]
    max_poll_retries: u32,

    /// Give up on a job after this many seconds
    #[arg(long, env = "SCPUSH_JOB_TIMEOUT")]
    job_timeout: Option<u64>,

    /// Validate the controller's TLS certificate
    #[arg(long, env = "SCPUSH_VERIFY_TLS")]
    verify_tls: bool,

    /// Per-request timeout in seconds
    #[arg(long, env = "SCPUSH_REQUEST_TIMEOUT", default_value_t = 120)]
    request_timeout: u64,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            poll_interval: Duration::from_secs(self.poll_interval),
            max_poll_retries: self.max_poll_retries,
            job_timeout: self.job_timeout.map(Duration::from_secs),
            accept_invalid_certs: !self.verify_tls,
            request_timeout: Some(Duration::from_secs(self.request_timeout)),
            output_path: self.output.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scpush=info,scpush_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Imports into every controller and reports whether all of them resolved
async fn run(cli: Cli) -> Result<bool> {
    let config = cli.config();
    config.validate()?;

    let reporter = Arc::new(
        TsvReporter::create(&config.output_path)
            .await
            .with_context(|| format!("Failed to create {}", config.output_path.display()))?,
    );

    // One connection pool shared by every controller
    let client = RedfishGateway::build_client(config.accept_invalid_certs, config.request_timeout)
        .context("Failed to build HTTP client")?;
    let credentials = Credentials::new(cli.username.clone(), cli.password.clone());

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let request = Arc::new(ImportRequest {
        config_path: cli.filename.clone(),
        target: cli.target,
        shutdown_type: cli.shutdown,
        end_power_state: cli.end_state,
    });

    info!(
        "Importing {} into {} controller(s)",
        request.config_path.display(),
        cli.ips.len()
    );

    let mut tasks = JoinSet::new();
    for ip in &cli.ips {
        let gateway: Arc<dyn HttpGateway> = Arc::new(RedfishGateway::with_client(
            endpoints::controller_url(ip),
            client.clone(),
            credentials.clone(),
        ));
        let reporter: Arc<dyn ResultReporter> = reporter.clone();
        let orchestrator = Orchestrator::new(gateway, reporter, config.clone());
        let request = Arc::clone(&request);
        let cancel = cancel.clone();

        tasks.spawn(async move {
            let outcome = orchestrator.run(&request, cancel).await;
            (orchestrator.source_url().to_string(), outcome)
        });
    }

    let mut all_resolved = true;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((source_url, outcome)) => {
                display::print_outcome(&source_url, &outcome);
                all_resolved &= outcome.is_success();
            }
            Err(e) => {
                error!("Import task panicked: {}", e);
                all_resolved = false;
            }
        }
    }

    info!("Results written to {}", reporter.path().display());

    Ok(all_resolved)
}

/// Cancels every running import on Ctrl-C
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling running imports");
            cancel.cancel();
        }
    });
}
