//! Error types for LetsCloud operations.
//!
//! Every failure in the request pipeline lands in one [`Error`] variant. The
//! variants are grouped into categories (request construction, transport,
//! authorization, decoding, provider-reported failure, validation and
//! configuration) so callers can branch on the class of failure without
//! matching every variant.

use thiserror::Error;

/// Main error type for LetsCloud operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No API key was configured when a request was built.
    #[error("No API key found. Provide your api-key!")]
    MissingCredential,

    /// The request could not be constructed (bad URL, unserializable body).
    #[error("error creating new request: {0}")]
    MakingRequest(String),

    /// The request could not be sent or its response could not be read.
    #[error("error sending request: {0}")]
    SendingRequest(String),

    /// The configured timeout elapsed before the response arrived.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The provider rejected the API key (HTTP 401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The response body was not a valid envelope or its data had the wrong shape.
    #[error("error decoding response body: {0}")]
    DecodingResponse(String),

    /// The provider answered with `success: false`; holds its message verbatim.
    #[error("{0}")]
    Api(String),

    /// A required argument or payload field was missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// An empty API key was supplied.
    #[error("error invalid token provided")]
    InvalidToken,

    /// A negative timeout was supplied.
    #[error("error invalid timeout provided")]
    InvalidTimeout,

    /// Invalid client configuration (base URL, HTTP client setup).
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Specialized result type for LetsCloud operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCredential => "MISSING_CREDENTIAL",
            Self::MakingRequest(_) => "MAKING_REQUEST",
            Self::SendingRequest(_) => "SENDING_REQUEST",
            Self::Timeout(_) => "TIMEOUT",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::DecodingResponse(_) => "DECODING_RESPONSE",
            Self::Api(_) => "API_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidTimeout => "INVALID_TIMEOUT",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Returns true if the request never left the client because it could not be built.
    #[must_use]
    pub const fn is_request_construction(&self) -> bool {
        matches!(self, Self::MissingCredential | Self::MakingRequest(_))
    }

    /// Returns true for network-level failures, including timeouts.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::SendingRequest(_) | Self::Timeout(_))
    }

    /// Returns true if the provider rejected the credentials.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Returns true if the response body could not be decoded.
    #[must_use]
    pub const fn is_decoding(&self) -> bool {
        matches!(self, Self::DecodingResponse(_))
    }

    /// Returns true if the provider reported the failure in its envelope.
    #[must_use]
    pub const fn is_api(&self) -> bool {
        matches!(self, Self::Api(_))
    }

    /// Returns true if an argument was rejected before any I/O took place.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true for invalid client configuration.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::InvalidToken | Self::InvalidTimeout | Self::Config(_))
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_builder() {
            Self::MakingRequest(err.to_string())
        } else if err.is_decode() {
            Self::DecodingResponse(err.to_string())
        } else {
            Self::SendingRequest(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::MakingRequest(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::DecodingResponse(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}
