//! Shared outbound HTTP client.

use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder};

/// User agent sent to the backend.
pub const USER_AGENT: &str = concat!("bloocube/", env!("CARGO_PKG_VERSION"));

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Whole-request timeout for backend calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin wrapper over `reqwest::Client` with the application's defaults:
/// user agent, timeouts, and no automatic redirect following (a backend
/// redirect is an answer, not something to chase).
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    pub fn inner(&self) -> &Client {
        &self.inner
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`HttpClient`].
pub struct HttpClientBuilder {
    builder: ClientBuilder,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            builder: Client::builder()
                .user_agent(USER_AGENT)
                .connect_timeout(CONNECT_TIMEOUT)
                .timeout(REQUEST_TIMEOUT)
                .redirect(Policy::none()),
        }
    }
}

impl HttpClientBuilder {
    /// Build the client, falling back to reqwest defaults if the TLS backend
    /// cannot be initialised with the custom settings.
    pub fn build(self) -> HttpClient {
        let inner = match self.builder.build() {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to build HTTP client with custom config; using defaults");
                Client::default()
            }
        };
        HttpClient { inner }
    }
}
