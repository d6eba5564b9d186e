//! HTTP transport for the LetsCloud API.
//!
//! [`Requester`] is the seam between the client facade and the network:
//! building a request and sending it are separate steps so that a test double
//! can stand in for either. [`HttpRequester`] is the `reqwest` implementation.

use crate::config::ClientConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method, Request, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Header carrying the API key on every request.
pub const API_TOKEN_HEADER: &str = "api-token";

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Builds and sends authenticated requests to the LetsCloud API.
#[async_trait]
pub trait Requester: Send + Sync {
    /// Builds a request for `path` (relative to the base URL) with an optional JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] when no API key is configured and
    /// [`Error::MakingRequest`] when the URL or body is invalid.
    fn build_request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Request>;

    /// Sends a request and returns the raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthorized`] on HTTP 401, [`Error::Timeout`] when the
    /// timeout elapses and [`Error::SendingRequest`] for any other network failure.
    async fn send_request(&self, request: Request) -> Result<Vec<u8>>;

    /// Replaces the per-request timeout.
    fn set_timeout(&mut self, timeout: Duration);

    /// Replaces the API key.
    fn set_api_key(&mut self, api_key: SecretString);

    /// Replaces the base URL.
    fn set_base_url(&mut self, base_url: Url);

    /// Returns the configured API key.
    fn api_key(&self) -> &SecretString;

    /// Returns whether request and response diagnostics are logged.
    fn debug(&self) -> bool;

    /// Enables or disables request and response diagnostics.
    fn set_debug(&mut self, debug: bool);
}

/// [`Requester`] backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpRequester {
    http: Client,
    config: ClientConfig,
}

impl HttpRequester {
    /// Creates a requester from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = ClientBuilder::new()
            .user_agent(config.user_agent())
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|err| Error::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self { http, config })
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl Requester for HttpRequester {
    fn build_request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Request> {
        if !self.config.has_api_key() {
            return Err(Error::MissingCredential);
        }

        let url = self.config.endpoint(path)?;
        if self.config.debug() {
            debug!(%method, %url, has_body = body.is_some(), "LetsCloud request");
        }

        let mut request = self
            .http
            .request(method, url)
            .header(API_TOKEN_HEADER, self.config.api_key().expose_secret())
            .header(ACCEPT, "application/json");

        if let Some(payload) = body {
            let bytes = serde_json::to_vec(&payload)
                .map_err(|err| Error::MakingRequest(format!("Failed to encode body: {err}")))?;
            request = request.header(CONTENT_TYPE, "application/json").body(bytes);
        }

        let timeout = self.config.timeout();
        if !timeout.is_zero() {
            request = request.timeout(timeout);
        }

        request.build().map_err(Error::from)
    }

    async fn send_request(&self, request: Request) -> Result<Vec<u8>> {
        let url = request.url().clone();
        let response = self.http.execute(request).await.map_err(Error::from)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unauthorized".to_string());
            return Err(Error::Unauthorized(message));
        }

        // Non-2xx bodies usually carry a `success: false` envelope; the
        // decoder classifies them.
        let bytes = response.bytes().await.map_err(|err| {
            if err.is_timeout() {
                Error::Timeout(err.to_string())
            } else {
                Error::SendingRequest(format!("Failed to read response body: {err}"))
            }
        })?;

        if self.config.debug() {
            debug!(
                %url,
                status = status.as_u16(),
                bytes = bytes.len(),
                body = %String::from_utf8_lossy(&bytes),
                "LetsCloud response"
            );
        }

        Ok(bytes.to_vec())
    }

    fn set_timeout(&mut self, timeout: Duration) {
        self.config.set_timeout(timeout);
    }

    fn set_api_key(&mut self, api_key: SecretString) {
        self.config.set_api_key(api_key);
    }

    fn set_base_url(&mut self, base_url: Url) {
        self.config.set_base_url(base_url);
    }

    fn api_key(&self) -> &SecretString {
        self.config.api_key()
    }

    fn debug(&self) -> bool {
        self.config.debug()
    }

    fn set_debug(&mut self, debug: bool) {
        self.config.set_debug(debug);
    }
}
