//! Result reporting
//!
//! Writes one line per finished import to a tab-separated results file.
//! Several jobs may report concurrently; writes are serialized.

use async_trait::async_trait;
use chrono::SecondsFormat;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::info;

use crate::orchestrator::Outcome;

/// Column header of the results file
pub const HEADER: &str = "source_url\tjob_id\tstatus\tsubmitted_at";

/// Sink for final import outcomes
#[async_trait]
pub trait ResultReporter: Send + Sync {
    /// Records the outcome of the import sent to `source_url`
    async fn report(&self, source_url: &str, outcome: &Outcome) -> io::Result<()>;
}

/// Tab-separated results file
pub struct TsvReporter {
    path: PathBuf,
    file: Mutex<File>,
}

impl TsvReporter {
    /// Creates (or truncates) the results file and writes the header
    pub async fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::create(&path).await?;
        file.write_all(format!("{}\n", HEADER).as_bytes()).await?;
        file.flush().await?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Formats the results line for one outcome
pub fn format_line(source_url: &str, outcome: &Outcome) -> String {
    let (job_id, submitted_at) = match outcome {
        Outcome::Finished(job) => (
            job.id.to_string(),
            job.submitted_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
        Outcome::Aborted(_) => ("-".to_string(), "-".to_string()),
    };

    format!(
        "{}\t{}\t{}\t{}",
        source_url,
        job_id,
        outcome.status_label(),
        submitted_at
    )
}

#[async_trait]
impl ResultReporter for TsvReporter {
    async fn report(&self, source_url: &str, outcome: &Outcome) -> io::Result<()> {
        let line = format_line(source_url, outcome);

        let mut file = self.file.lock().await;
        file.write_all(format!("{}\n", line).as_bytes()).await?;
        file.flush().await?;

        info!("Wrote result for {} to {}", source_url, self.path.display());
        Ok(())
    }
}
