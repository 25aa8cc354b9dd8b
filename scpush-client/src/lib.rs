//! scpush HTTP Client
//!
//! Authenticated HTTPS access to a Redfish management controller.
//!
//! The import workflow only needs two verbs, so the client is exposed as the
//! [`HttpGateway`] trait. [`RedfishGateway`] is the reqwest-backed
//! implementation; tests substitute an in-memory one.
//!
//! # Example
//!
//! ```no_run
//! use scpush_client::{Credentials, HttpGateway, RedfishGateway, endpoints};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = RedfishGateway::new(
//!         endpoints::controller_url("192.168.0.120"),
//!         Credentials::new("root", "calvin"),
//!         true,
//!     )?;
//!
//!     let response = gateway.get("/redfish/v1").await?;
//!     println!("Controller answered with {}", response.status);
//!     Ok(())
//! }
//! ```

pub mod endpoints;
pub mod error;

// Re-export commonly used types
pub use error::{GatewayError, Result};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Raw HTTP response handed back to callers
///
/// Header names are stored lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Adds a header, lowercasing its name
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_ascii_lowercase(), value.into()));
        self
    }

    /// First value of a header, matched case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserializes the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }

    async fn from_reqwest(response: reqwest::Response) -> Result<Self> {
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await.map_err(GatewayError::from_reqwest)?;

        Ok(Self {
            status,
            headers,
            body,
        })
    }
}

/// HTTP Basic credentials for the controller
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authenticated POST/GET against one controller
///
/// Paths are relative to [`HttpGateway::base_url`]. Non-2xx responses are
/// returned as values; only transport failures are errors.
#[async_trait]
pub trait HttpGateway: Send + Sync {
    /// Base URL of the controller (e.g., "https://192.168.0.120")
    fn base_url(&self) -> &str;

    /// Sends `body` with the given extra headers
    async fn post(&self, path: &str, body: String, headers: &[(&str, &str)])
    -> Result<HttpResponse>;

    async fn get(&self, path: &str) -> Result<HttpResponse>;
}

/// reqwest implementation of [`HttpGateway`]
#[derive(Debug, Clone)]
pub struct RedfishGateway {
    /// Base URL of the controller
    base_url: String,
    /// HTTP client instance, cheap to clone and share between controllers
    client: Client,
    credentials: Credentials,
}

impl RedfishGateway {
    /// Create a gateway with its own HTTP client
    ///
    /// # Arguments
    /// * `base_url` - The controller base URL
    /// * `credentials` - Basic auth credentials sent with every request
    /// * `accept_invalid_certs` - Skip TLS certificate validation (self-signed controllers)
    pub fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        accept_invalid_certs: bool,
    ) -> Result<Self> {
        let client = Self::build_client(accept_invalid_certs, None)?;
        Ok(Self::with_client(base_url, client, credentials))
    }

    /// Create a gateway around an existing client
    ///
    /// This allows one connection pool to serve several controllers.
    pub fn with_client(base_url: impl Into<String>, client: Client, credentials: Credentials) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            credentials,
        }
    }

    /// Build a client configured for management controllers
    ///
    /// # Arguments
    /// * `accept_invalid_certs` - Disable certificate validation
    /// * `timeout` - Per-request timeout, none by default
    pub fn build_client(accept_invalid_certs: bool, timeout: Option<Duration>) -> Result<Client> {
        let mut builder = Client::builder().danger_accept_invalid_certs(accept_invalid_certs);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().map_err(GatewayError::from_reqwest)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl HttpGateway for RedfishGateway {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post(
        &self,
        path: &str,
        body: String,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse> {
        let url = self.url(path);
        debug!("POST {} ({} bytes)", url, body.len());

        let mut request = self
            .client
            .post(&url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .body(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(GatewayError::from_reqwest)?;
        HttpResponse::from_reqwest(response).await
    }

    async fn get(&self, path: &str) -> Result<HttpResponse> {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .await
            .map_err(GatewayError::from_reqwest)?;

        HttpResponse::from_reqwest(response).await
    }
}
