//! Import configuration
//!
//! Tunables for talking to controllers: polling cadence, retry ceiling,
//! per-job deadline, TLS policy and where results are written.

use std::path::PathBuf;
use std::time::Duration;

/// Import configuration
///
/// Defaults match what controllers tolerate well: a status query every
/// 10 seconds and up to 10 consecutive bad status responses.
#[derive(Debug, Clone)]
pub struct Config {
    /// Delay between status queries
    pub poll_interval: Duration,

    /// Consecutive bad status responses tolerated before giving up
    pub max_poll_retries: u32,

    /// Upper bound on total polling time for one job
    pub job_timeout: Option<Duration>,

    /// Skip TLS certificate validation (controllers ship self-signed certs)
    pub accept_invalid_certs: bool,

    /// Timeout applied to each HTTP request
    pub request_timeout: Option<Duration>,

    /// Tab-separated results file
    pub output_path: PathBuf,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            max_poll_retries: 10,
            job_timeout: None,
            accept_invalid_certs: true,
            request_timeout: Some(Duration::from_secs(120)),
            output_path: output_path.into(),
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if matches!(self.job_timeout, Some(timeout) if timeout.is_zero()) {
            anyhow::bail!("job_timeout must be greater than 0 when set");
        }

        if matches!(self.request_timeout, Some(timeout) if timeout.is_zero()) {
            anyhow::bail!("request_timeout must be greater than 0 when set");
        }

        if self.output_path.as_os_str().is_empty() {
            anyhow::bail!("output_path cannot be empty");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("status.txt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.max_poll_retries, 10);
        assert!(config.job_timeout.is_none());
        assert!(config.accept_invalid_certs);
        assert_eq!(config.output_path, PathBuf::from("status.txt"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());
        config.poll_interval = Duration::from_secs(1);

        config.job_timeout = Some(Duration::ZERO);
        assert!(config.validate().is_err());
        config.job_timeout = Some(Duration::from_secs(600));
        assert!(config.validate().is_ok());

        config.request_timeout = Some(Duration::ZERO);
        assert!(config.validate().is_err());
        config.request_timeout = None;
        assert!(config.validate().is_ok());

        config.output_path = PathBuf::new();
        assert!(config.validate().is_err());
    }
}
