use crate::error::Result;
use reqwest::header::{HeaderMap, HeaderValue, IntoHeaderName, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use url::form_urlencoded;

/// A single logical request travelling through a session.
///
/// The URL may be relative when handed to a session; it is normalized
/// against the configured host before the first dispatch. `auth_retried`
/// records whether this request has already been re-sent after an
/// authentication failure, and can only ever be set once.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    method: Method,
    url: String,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    auth_retried: bool,
}

impl PendingRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        PendingRequest {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
            auth_retried: false,
        }
    }

    /// Add a header; later values replace earlier ones for the same name
    pub fn with_header<K: IntoHeaderName>(mut self, key: K, value: HeaderValue) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Merge a header map into this request
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body
    pub fn with_json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self> {
        let body = serde_json::to_vec(value)?;
        Ok(self
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .with_body(body))
    }

    /// Encode `pairs` as an `application/x-www-form-urlencoded` body
    pub fn with_form(self, pairs: &[(&str, &str)]) -> Self {
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        self.with_header(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        )
        .with_body(body)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn auth_retried(&self) -> bool {
        self.auth_retried
    }

    pub(crate) fn set_url(&mut self, url: String) {
        self.url = url;
    }

    /// Mutable access for pre-request hooks
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Flip the retry flag. Returns false if it was already set.
    pub(crate) fn mark_auth_retried(&mut self) -> bool {
        if self.auth_retried {
            return false;
        }
        self.auth_retried = true;
        true
    }

    /// The request as it goes on the wire: session auth headers first,
    /// request headers on top.
    pub(crate) fn authorized(&self, auth_headers: &HeaderMap) -> PendingRequest {
        let mut headers = auth_headers.clone();
        headers.extend(self.headers.clone());
        PendingRequest {
            method: self.method.clone(),
            url: self.url.clone(),
            headers,
            body: self.body.clone(),
            auth_retried: self.auth_retried,
        }
    }
}
