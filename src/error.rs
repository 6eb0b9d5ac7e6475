use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for session operations
#[derive(Debug, Error)]
pub enum Error {
    /// Session configuration could not be resolved
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Token acquisition failed
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Network failure on the underlying HTTP call
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request building error
    #[error("failed to build request: {0}")]
    RequestBuild(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while resolving a session configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("'{0}' is not a valid api_host url")]
    InvalidHost(String),
}

/// Errors raised by the token issuer.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no api key configured, set TRUSTPILOT_API_KEY or pass api_key")]
    MissingApiKey,

    #[error("token issuer unreachable: {0}")]
    Unreachable(#[source] Box<Error>),

    #[error("token issuer returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("token issuer response has no access_token")]
    MissingAccessToken,

    #[error("token issuer response is not valid JSON: {0}")]
    InvalidResponse(#[source] serde_json::Error),

    #[error("{0} cannot be sent as an HTTP header value")]
    InvalidHeader(&'static str),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(Box::new(err))
    }
}

impl From<reqwest::header::InvalidHeaderValue> for Error {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Error::RequestBuild(err.to_string())
    }
}

impl Error {
    /// Create a transport error from any message or error value
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Transport(err.into())
    }

    /// Check if this error came from token acquisition
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth(_))
    }

    /// Check if this error is a network failure
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// Get the HTTP status code if the token issuer rejected the request
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Error::Auth(AuthError::Rejected { status, .. }) => StatusCode::from_u16(*status).ok(),
            _ => None,
        }
    }
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, Error>;
