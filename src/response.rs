use crate::error::Result;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A fully read HTTP response.
///
/// Non-success statuses are ordinary responses here; only authentication
/// failures are acted upon by the session.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    url: String,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    pub fn new(status: StatusCode, url: impl Into<String>, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        Response {
            status,
            url: url.into(),
            headers,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Numeric status code
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Final URL the response was received from
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body bytes
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body as JSON into `T`
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Parse the body as a JSON value, if it is JSON
    pub fn json_value(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// True for 401 and 403, the statuses that trigger re-authentication
    pub fn is_auth_failure(&self) -> bool {
        is_auth_failure(self.status)
    }
}

pub(crate) fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}
