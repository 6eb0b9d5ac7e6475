use crate::config::{SessionConfig, SessionOptions};
use crate::dispatch::{BlockingDispatcher, Dispatcher};
use crate::error::Result;
use crate::request::PendingRequest;
use crate::response::Response;
use crate::state::SessionState;
use crate::token::fetch_token;
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::Serialize;
use std::sync::Arc;

/// Blocking authenticated session.
///
/// Every verb method runs the full protocol on the calling thread: attach
/// the current auth headers, dispatch, and on a 401/403 fetch a new token
/// and dispatch exactly once more. A session is `Send + Sync` and can be
/// shared between threads; the token is swapped atomically, so concurrent
/// requests always see either the old or the new auth headers.
pub struct Session<D: Dispatcher = BlockingDispatcher> {
    state: SessionState,
    dispatcher: D,
}

impl Session<BlockingDispatcher> {
    /// Create a session configured from the environment
    pub fn new() -> Result<Self> {
        Self::with_options(SessionOptions::new())
    }

    /// Create a session from explicit options, falling back to the environment
    pub fn with_options(options: SessionOptions) -> Result<Self> {
        Self::with_dispatcher(options.resolve()?, BlockingDispatcher::new()?)
    }
}

impl<D: Dispatcher> Session<D> {
    /// Create a session on top of a custom transport
    pub fn with_dispatcher(config: SessionConfig, dispatcher: D) -> Result<Self> {
        Ok(Session {
            state: SessionState::new(config)?,
            dispatcher,
        })
    }

    /// Re-resolve the configuration from `options`.
    ///
    /// Authentication is reset: the next request goes out without a token
    /// unless the new options carry an access token.
    pub fn setup(&self, options: SessionOptions) -> Result<()> {
        let config = options.resolve()?;
        tracing::debug!("Session re-homed to {}", config.api_host());
        self.state.reconfigure(config)
    }

    /// Replace the configuration with an already resolved one
    pub fn reconfigure(&self, config: SessionConfig) -> Result<()> {
        self.state.reconfigure(config)
    }

    pub fn config(&self) -> Arc<SessionConfig> {
        self.state.config()
    }

    /// Current bearer token, `None` until the first successful token fetch
    pub fn access_token(&self) -> Option<String> {
        self.state.access_token()
    }

    /// Headers currently attached to every request
    pub fn auth_headers(&self) -> HeaderMap {
        self.state.auth_headers()
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Register a callback run on each request before it is first sent
    pub fn register_pre_hook<F>(&self, hook: F)
    where
        F: Fn(&mut PendingRequest) + Send + Sync + 'static,
    {
        self.state.hooks().register_pre(Arc::new(hook));
    }

    /// Register a callback run on each final response
    pub fn register_post_hook<F>(&self, hook: F)
    where
        F: Fn(&Response) + Send + Sync + 'static,
    {
        self.state.hooks().register_post(Arc::new(hook));
    }

    /// Fetch a new token from the issuer and make it the session's token
    pub fn authenticate(&self) -> Result<String> {
        let config = self.state.config();
        let token = fetch_token(&self.dispatcher, &config)?;
        self.state.store_token(token.clone(), &config)?;
        Ok(token)
    }

    /// Send `request`, re-authenticating once if the API rejects it.
    ///
    /// Returns the first response that is not a 401/403, or the response
    /// to the single retry whatever its status.
    pub fn send(&self, request: PendingRequest) -> Result<Response> {
        let mut request = self.state.prepare(request);

        loop {
            let outgoing = request.authorized(&self.state.auth_headers());
            let response = self.dispatcher.dispatch(&outgoing)?;

            if response.is_auth_failure() && request.mark_auth_retried() {
                tracing::info!(
                    "Got {} from {}, reauthenticating and retrying once",
                    response.status(),
                    request.url()
                );
                self.authenticate()?;
                continue;
            }

            self.state.hooks().run_post(&response);
            return Ok(response);
        }
    }

    pub fn get(&self, path: &str) -> Result<Response> {
        self.send(PendingRequest::new(Method::GET, path))
    }

    pub fn delete(&self, path: &str) -> Result<Response> {
        self.send(PendingRequest::new(Method::DELETE, path))
    }

    pub fn head(&self, path: &str) -> Result<Response> {
        self.send(PendingRequest::new(Method::HEAD, path))
    }

    pub fn options(&self, path: &str) -> Result<Response> {
        self.send(PendingRequest::new(Method::OPTIONS, path))
    }

    pub fn post(&self, path: &str, body: impl Into<Vec<u8>>) -> Result<Response> {
        self.send(PendingRequest::new(Method::POST, path).with_body(body))
    }

    pub fn put(&self, path: &str, body: impl Into<Vec<u8>>) -> Result<Response> {
        self.send(PendingRequest::new(Method::PUT, path).with_body(body))
    }

    pub fn patch(&self, path: &str, body: impl Into<Vec<u8>>) -> Result<Response> {
        self.send(PendingRequest::new(Method::PATCH, path).with_body(body))
    }

    pub fn post_json<T: Serialize + ?Sized>(&self, path: &str, value: &T) -> Result<Response> {
        self.send(PendingRequest::new(Method::POST, path).with_json(value)?)
    }

    pub fn put_json<T: Serialize + ?Sized>(&self, path: &str, value: &T) -> Result<Response> {
        self.send(PendingRequest::new(Method::PUT, path).with_json(value)?)
    }

    pub fn patch_json<T: Serialize + ?Sized>(&self, path: &str, value: &T) -> Result<Response> {
        self.send(PendingRequest::new(Method::PATCH, path).with_json(value)?)
    }
}

impl<D: Dispatcher> std::fmt::Debug for Session<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let config = self.state.config();
        f.debug_struct("Session")
            .field("api_host", &config.api_host())
            .field("api_version", &config.api_version())
            .field("authenticated", &self.state.access_token().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_with_options() {
        let session = Session::with_options(
            SessionOptions::new()
                .with_api_host("http://localhost:8080")
                .with_api_version("v2"),
        )
        .unwrap();

        assert_eq!(session.config().api_host(), "http://localhost:8080");
        assert_eq!(session.config().api_version(), "v2");
        assert!(session.access_token().is_none());
        assert!(session.auth_headers().is_empty());
    }

    #[test]
    fn test_session_invalid_host() {
        let result = Session::with_options(SessionOptions::new().with_api_host("localhost"));
        assert!(result.is_err());
    }

    #[test]
    fn test_setup_rehomes_and_resets_auth() {
        let session = Session::with_options(
            SessionOptions::new()
                .with_api_host("http://localhost:8080")
                .with_access_token("old-token"),
        )
        .unwrap();
        assert_eq!(session.access_token().as_deref(), Some("old-token"));

        session
            .setup(SessionOptions::new().with_api_host("https://api.tp-staging.com"))
            .unwrap();

        assert_eq!(session.config().api_host(), "https://api.tp-staging.com");
        assert!(session.access_token().is_none());
        assert!(session.auth_headers().is_empty());
    }
}
