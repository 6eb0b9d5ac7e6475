use crate::config::SessionConfig;
use crate::error::{AuthError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, USER_AGENT};

/// Header carrying the API key on authenticated requests
pub const API_KEY_HEADER: &str = "apikey";

/// Encode a credential as a header value, naming it in the error
pub(crate) fn credential_header(value: &str, what: &'static str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| AuthError::InvalidHeader(what).into())
}

/// Authentication state shared by every request of a session.
///
/// A token and its headers are only ever built together by
/// [`AuthState::authenticated`], and sessions swap the whole value, so a
/// present token always has a matching `Authorization: Bearer` entry.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    access_token: Option<String>,
    headers: HeaderMap,
}

impl AuthState {
    /// State before any token was fetched: no token, no headers
    pub fn unauthenticated() -> Self {
        Self::default()
    }

    /// State holding `token`, with the headers derived from `config`
    pub fn authenticated(token: String, config: &SessionConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, credential_header(&format!("Bearer {}", token), "access token")?);
        if let Some(api_key) = config.api_key() {
            headers.insert(HeaderName::from_static(API_KEY_HEADER), credential_header(api_key, "api key")?);
        }
        headers.insert(USER_AGENT, credential_header(config.user_agent(), "user agent")?);

        Ok(AuthState {
            access_token: Some(token),
            headers,
        })
    }

    /// Initial state for a freshly configured session
    pub fn initial(config: &SessionConfig) -> Result<Self> {
        match config.access_token() {
            Some(token) => Self::authenticated(token.to_string(), config),
            None => Ok(Self::unauthenticated()),
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}
