//! Error types for the Redfish gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Transport-level failures talking to a controller
///
/// An HTTP response with an error status is not a `GatewayError`; callers
/// receive it as an [`HttpResponse`](crate::HttpResponse) and decide.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Controller could not be reached
    #[error("Connection to controller failed: {0}")]
    Connection(String),

    /// Request did not finish in time
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl GatewayError {
    /// Classifies a reqwest error into the closest variant
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else {
            Self::RequestFailed(err)
        }
    }
}
