//! Configuration for LetsCloud clients.
//!
//! [`ClientConfig`] is owned by a single client instance and read by the
//! transport on every request build. Mutation goes through `&mut self`, so a
//! setter cannot run while a request borrowing the client is in flight; share
//! a client across tasks only behind your own lock.

use crate::{Error, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

/// Default LetsCloud API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://core.letscloud.io/api";

/// Default request timeout (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default `User-Agent` header value.
pub const DEFAULT_USER_AGENT: &str = concat!("letscloud-rust/", env!("CARGO_PKG_VERSION"));

// Unreserved characters (RFC 3986) stay as-is; everything else, `/?#%` included, is escaped.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "LETSCLOUD_API_KEY";
/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "LETSCLOUD_BASE_URL";
/// Environment variable overriding the timeout, in whole seconds.
pub const ENV_TIMEOUT_SECS: &str = "LETSCLOUD_TIMEOUT_SECS";
/// Environment variable enabling debug logging (`1`/`true`).
pub const ENV_DEBUG: &str = "LETSCLOUD_DEBUG";

/// Connection settings for the LetsCloud API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    api_key: SecretString,
    base_url: Url,
    timeout: Duration,
    debug: bool,
    user_agent: String,
}

impl ClientConfig {
    /// Creates a configuration with the given API key and default settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidToken`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::InvalidToken);
        }

        Ok(Self {
            api_key: SecretString::from(api_key),
            base_url: parse_base_url(DEFAULT_BASE_URL)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            debug: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Loads the configuration from `LETSCLOUD_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or any override is invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidToken`] when no API key is found and
    /// [`Error::Config`] when an override cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(lookup(ENV_API_KEY).unwrap_or_default())?;

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config = config.with_base_url(&base_url)?;
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            let secs = timeout.trim().parse::<u64>().map_err(|err| {
                Error::Config(format!("Invalid {ENV_TIMEOUT_SECS} `{timeout}`: {err}"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        if let Some(debug) = lookup(ENV_DEBUG) {
            let debug = debug.trim();
            config = config.with_debug(debug == "1" || debug.eq_ignore_ascii_case("true"));
        }

        Ok(config)
    }

    /// Overrides the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the URL cannot be parsed.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    /// Overrides the request timeout. `Duration::ZERO` disables it.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables or disables debug logging.
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Overrides the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the API key.
    #[must_use]
    pub const fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    /// Returns the base URL every endpoint path is resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns whether debug logging is enabled.
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }

    /// Returns the `User-Agent` header value.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Replaces the API key. An empty key is stored as-is and surfaces as
    /// [`Error::MissingCredential`] on the next request build.
    pub fn set_api_key(&mut self, api_key: SecretString) {
        self.api_key = api_key;
    }

    /// Replaces the base URL.
    pub fn set_base_url(&mut self, base_url: Url) {
        self.base_url = normalize(base_url);
    }

    /// Replaces the request timeout.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Toggles debug logging.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Returns true if an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }

    /// Resolves an endpoint path (`/instances/abc`) beneath the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MakingRequest`] if the joined URL is invalid.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| Error::MakingRequest(format!("Invalid path `{path}`: {err}")))
    }
}

/// Parses a base URL, requiring an `http` or `https` scheme.
///
/// # Errors
///
/// Returns [`Error::Config`] if the URL is invalid.
pub fn parse_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url)
        .map_err(|err| Error::Config(format!("Invalid base URL `{base_url}`: {err}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "Invalid base URL `{base_url}`: unsupported scheme `{}`",
            url.scheme()
        )));
    }

    Ok(normalize(url))
}

/// Percent-encodes a caller-supplied identifier as exactly one URL path segment.
///
/// # Errors
///
/// Returns [`Error::Validation`] for `.` and `..`, which a URL parser would
/// resolve against the surrounding path.
pub fn path_segment(value: &str) -> Result<String> {
    if matches!(value, "." | "..") {
        return Err(Error::Validation(format!(
            "`{value}` is not a valid identifier"
        )));
    }

    Ok(utf8_percent_encode(value, PATH_SEGMENT).to_string())
}

// `Url::join` replaces the last segment unless the path ends with `/`.
fn normalize(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
