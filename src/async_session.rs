//! Async authenticated session.
//!
//! Runs the same protocol as [`crate::Session`] but suspends at every I/O
//! boundary instead of blocking. Requests sharing a session run
//! concurrently; the auth state is never locked across an `.await`.

use std::future::Future;
use std::sync::Arc;

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::Serialize;

use crate::config::{SessionConfig, SessionOptions};
use crate::dispatch::{AsyncDispatcher, ClientDispatcher, ResponseHandle};
use crate::error::Result;
use crate::request::PendingRequest;
use crate::response::{is_auth_failure, Response};
use crate::state::SessionState;
use crate::token::fetch_token_async;

/// Async counterpart of [`crate::Session`]
pub struct AsyncSession<D: AsyncDispatcher = ClientDispatcher> {
    state: SessionState,
    dispatcher: D,
}

impl AsyncSession<ClientDispatcher> {
    /// Create a session configured from the environment
    pub fn new() -> Result<Self> {
        Self::with_options(SessionOptions::new())
    }

    /// Create a session from explicit options, falling back to the environment
    pub fn with_options(options: SessionOptions) -> Result<Self> {
        Self::with_dispatcher(options.resolve()?, ClientDispatcher::new()?)
    }
}

impl<D: AsyncDispatcher> AsyncSession<D> {
    /// Create a session on top of a custom transport
    pub fn with_dispatcher(config: SessionConfig, dispatcher: D) -> Result<Self> {
        Ok(AsyncSession {
            state: SessionState::new(config)?,
            dispatcher,
        })
    }

    /// Re-resolve the configuration from `options`, resetting authentication
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

    pub fn access_token(&self) -> Option<String> {
        self.state.access_token()
    }

    pub fn auth_headers(&self) -> HeaderMap {
        self.state.auth_headers()
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn register_pre_hook<F>(&self, hook: F)
    where
        F: Fn(&mut PendingRequest) + Send + Sync + 'static,
    {
        self.state.hooks().register_pre(Arc::new(hook));
    }

    pub fn register_post_hook<F>(&self, hook: F)
    where
        F: Fn(&Response) + Send + Sync + 'static,
    {
        self.state.hooks().register_post(Arc::new(hook));
    }

    /// Fetch a new token from the issuer and make it the session's token
    pub async fn authenticate(&self) -> Result<String> {
        let config = self.state.config();
        let token = fetch_token_async(&self.dispatcher, &config).await?;
        self.state.store_token(token.clone(), &config)?;
        Ok(token)
    }

    /// Run `f` against the streaming response to `request`.
    ///
    /// The connection is held only while `f` runs and is released when it
    /// returns, fails, or the returned future is dropped. If the first
    /// attempt is rejected with 401/403 its connection is released before
    /// the token is fetched and the request is sent again. Post-response
    /// hooks are not run here since the body is never buffered; use
    /// [`AsyncSession::send`] for that.
    pub async fn request_scoped<F, Fut, T>(&self, request: PendingRequest, f: F) -> Result<T>
    where
        F: FnOnce(D::Handle) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let handle = self.open(request).await?;
        f(handle).await
    }

    /// Send `request` and read the whole response
    pub async fn send(&self, request: PendingRequest) -> Result<Response> {
        let response = self.request_scoped(request, |handle| handle.read()).await?;
        self.state.hooks().run_post(&response);
        Ok(response)
    }

    async fn open(&self, request: PendingRequest) -> Result<D::Handle> {
        let mut request = self.state.prepare(request);

        loop {
            let outgoing = request.authorized(&self.state.auth_headers());
            let handle = self.dispatcher.dispatch(&outgoing).await?;

            if is_auth_failure(handle.status()) && request.mark_auth_retried() {
                tracing::info!(
                    "Got {} from {}, reauthenticating and retrying once",
                    handle.status(),
                    request.url()
                );
                drop(handle);
                self.authenticate().await?;
                continue;
            }

            return Ok(handle);
        }
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        self.send(PendingRequest::new(Method::GET, path)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Response> {
        self.send(PendingRequest::new(Method::DELETE, path)).await
    }

    pub async fn head(&self, path: &str) -> Result<Response> {
        self.send(PendingRequest::new(Method::HEAD, path)).await
    }

    pub async fn options(&self, path: &str) -> Result<Response> {
        self.send(PendingRequest::new(Method::OPTIONS, path)).await
    }

    pub async fn post(&self, path: &str, body: impl Into<Vec<u8>>) -> Result<Response> {
        self.send(PendingRequest::new(Method::POST, path).with_body(body)).await
    }

    pub async fn put(&self, path: &str, body: impl Into<Vec<u8>>) -> Result<Response> {
        self.send(PendingRequest::new(Method::PUT, path).with_body(body)).await
    }

    pub async fn patch(&self, path: &str, body: impl Into<Vec<u8>>) -> Result<Response> {
        self.send(PendingRequest::new(Method::PATCH, path).with_body(body)).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(&self, path: &str, value: &T) -> Result<Response> {
        self.send(PendingRequest::new(Method::POST, path).with_json(value)?).await
    }

    pub async fn put_json<T: Serialize + ?Sized>(&self, path: &str, value: &T) -> Result<Response> {
        self.send(PendingRequest::new(Method::PUT, path).with_json(value)?).await
    }

    pub async fn patch_json<T: Serialize + ?Sized>(&self, path: &str, value: &T) -> Result<Response> {
        self.send(PendingRequest::new(Method::PATCH, path).with_json(value)?).await
    }
}

impl<D: AsyncDispatcher> std::fmt::Debug for AsyncSession<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let config = self.state.config();
        f.debug_struct("AsyncSession")
            .field("api_host", &config.api_host())
            .field("api_version", &config.api_version())
            .field("authenticated", &self.state.access_token().is_some())
            .finish()
    }
}
