#![cfg(feature = "async")]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use trustpilot::config::DEFAULT_TOKEN_ISSUER_PATH;
use trustpilot::header::{HeaderMap, AUTHORIZATION};
use trustpilot::{
    AsyncDispatcher, AsyncSession, AuthError, Error, PendingRequest, Response, ResponseHandle, Result,
    SessionConfig, SessionOptions, StatusCode,
};

/// Connection bookkeeping shared by a dispatcher and its handles
#[derive(Default)]
struct Connections {
    live: AtomicUsize,
    max_live: AtomicUsize,
    opened: AtomicUsize,
    released: AtomicUsize,
}

impl Connections {
    fn open(&self) {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_live.fetch_max(live, Ordering::SeqCst);
    }

    fn release(&self) {
        self.released.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

struct FakeHandle {
    response: Option<Response>,
    connections: Arc<Connections>,
}

impl Drop for FakeHandle {
    fn drop(&mut self) {
        self.connections.release();
    }
}

#[async_trait]
impl ResponseHandle for FakeHandle {
    fn status(&self) -> StatusCode {
        self.response.as_ref().map(Response::status).unwrap_or(StatusCode::OK)
    }

    fn url(&self) -> &str {
        self.response.as_ref().map(Response::url).unwrap_or_default()
    }

    fn headers(&self) -> &HeaderMap {
        self.response.as_ref().map(Response::headers).expect("response already read")
    }

    async fn read(mut self) -> Result<Response> {
        tokio::task::yield_now().await;
        Ok(self.response.take().expect("response already read"))
    }
}

struct FakeDispatcher {
    script: Mutex<VecDeque<(u16, &'static str)>>,
    token: (u16, &'static str),
    delay: Option<Duration>,
    connections: Arc<Connections>,
    api_requests: Mutex<Vec<PendingRequest>>,
    token_fetches: AtomicUsize,
}

impl FakeDispatcher {
    fn new(script: &[(u16, &'static str)]) -> Self {
        FakeDispatcher {
            script: Mutex::new(script.iter().copied().collect()),
            token: (200, r#"{"access_token": "foobarbaz"}"#),
            delay: None,
            connections: Arc::new(Connections::default()),
            api_requests: Mutex::new(Vec::new()),
            token_fetches: AtomicUsize::new(0),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn with_token(mut self, status: u16, body: &'static str) -> Self {
        self.token = (status, body);
        self
    }

    fn token_fetches(&self) -> usize {
        self.token_fetches.load(Ordering::SeqCst)
    }

    fn api_requests(&self) -> Vec<PendingRequest> {
        self.api_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AsyncDispatcher for FakeDispatcher {
    type Handle = FakeHandle;

    async fn dispatch(&self, request: &PendingRequest) -> Result<FakeHandle> {
        let (status, body) = if request.url().ends_with(DEFAULT_TOKEN_ISSUER_PATH) {
            self.token_fetches.fetch_add(1, Ordering::SeqCst);
            self.token
        } else {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.api_requests.lock().unwrap().push(request.clone());
            self.script.lock().unwrap().pop_front().unwrap_or((200, "{}"))
        };

        self.connections.open();
        Ok(FakeHandle {
            response: Some(Response::new(
                StatusCode::from_u16(status).unwrap(),
                request.url(),
                HeaderMap::new(),
                body,
            )),
            connections: self.connections.clone(),
        })
    }
}

fn config() -> SessionConfig {
    SessionOptions::new()
        .with_api_host("https://api.tp-staging.com")
        .with_api_key("something")
        .with_api_secret("secret")
        .resolve_with(|_| None)
        .unwrap()
}

fn session(dispatcher: FakeDispatcher) -> AsyncSession<FakeDispatcher> {
    AsyncSession::with_dispatcher(config(), dispatcher).unwrap()
}

#[tokio::test]
async fn test_reauthenticates_once_after_401() {
    let session = session(FakeDispatcher::new(&[(401, ""), (200, r#"{"foo": "foobarbaz"}"#)]));

    let response = session.get("/foo/bar").await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json_value().unwrap()["foo"], "foobarbaz");
    assert_eq!(session.access_token().as_deref(), Some("foobarbaz"));
    assert_eq!(session.dispatcher().token_fetches(), 1);

    let requests = session.dispatcher().api_requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].headers().get(AUTHORIZATION).is_none());
    assert_eq!(requests[1].headers().get(AUTHORIZATION).unwrap(), "Bearer foobarbaz");
}

#[tokio::test]
async fn test_connections_released_one_at_a_time() {
    let session = session(FakeDispatcher::new(&[(401, ""), (200, "{}")]));

    session.get("/foo/bar").await.unwrap();

    let connections = &session.dispatcher().connections;
    // first attempt, token fetch, retry
    assert_eq!(connections.opened.load(Ordering::SeqCst), 3);
    assert_eq!(connections.released.load(Ordering::SeqCst), 3);
    assert_eq!(connections.live.load(Ordering::SeqCst), 0);
    assert_eq!(connections.max_live.load(Ordering::SeqCst), 1, "rejected connection held during retry");
}

#[tokio::test]
async fn test_second_auth_failure_returned_verbatim() {
    let session = session(FakeDispatcher::new(&[(403, ""), (401, "denied")]));

    let response = session.get("/foo/bar").await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.text(), "denied");
    assert_eq!(session.dispatcher().token_fetches(), 1);
}

#[tokio::test]
async fn test_token_rejection_releases_connection() {
    let session = session(FakeDispatcher::new(&[(401, "")]).with_token(401, "bad credentials"));

    let error = session.get("/foo/bar").await.unwrap_err();

    assert!(matches!(error, Error::Auth(AuthError::Rejected { status: 401, .. })));
    assert_eq!(error.status_code(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(session.dispatcher().api_requests().len(), 1);
    assert_eq!(session.dispatcher().connections.live.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_scoped_handle_released_on_success() {
    let session = session(FakeDispatcher::new(&[(200, "streamed")]));

    let status = session
        .request_scoped(PendingRequest::new(trustpilot::Method::GET, "/export"), |handle| async move {
            Ok(handle.status())
        })
        .await
        .unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(session.dispatcher().connections.released.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_scoped_handle_released_on_error() {
    let session = session(FakeDispatcher::new(&[(200, "{}")]));

    let result: Result<()> = session
        .request_scoped(PendingRequest::new(trustpilot::Method::GET, "/export"), |handle| async move {
            let _ = handle.status();
            Err(Error::transport("consumer gave up"))
        })
        .await;

    assert!(result.unwrap_err().is_transport());
    assert_eq!(session.dispatcher().connections.released.load(Ordering::SeqCst), 1);
    assert_eq!(session.dispatcher().connections.live.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_scope_releases_handle() {
    let session = session(FakeDispatcher::new(&[(200, "{}")]));

    let scoped = session.request_scoped(PendingRequest::new(trustpilot::Method::GET, "/export"), |handle| async move {
        tokio::time::sleep(Duration::from_secs(60)).await;
        drop(handle);
        Ok(())
    });
    let result = tokio::time::timeout(Duration::from_secs(1), scoped).await;

    assert!(result.is_err(), "scope should have been cancelled");
    let connections = &session.dispatcher().connections;
    assert_eq!(connections.opened.load(Ordering::SeqCst), 1);
    assert_eq!(connections.released.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_request_does_not_reauthenticate() {
    let session = session(FakeDispatcher::new(&[(401, "")]).with_delay(Duration::from_secs(60)));

    let result = tokio::time::timeout(Duration::from_secs(1), session.get("/slow")).await;

    assert!(result.is_err(), "request should have been cancelled");
    assert_eq!(session.dispatcher().token_fetches(), 0);
    assert_eq!(session.dispatcher().connections.live.load(Ordering::SeqCst), 0);
    assert!(session.access_token().is_none());
}

#[tokio::test]
async fn test_post_hooks_skip_discarded_response() {
    let session = session(FakeDispatcher::new(&[(401, ""), (200, "{}")]));
    let statuses = Arc::new(Mutex::new(Vec::new()));
    let pre_calls = Arc::new(AtomicUsize::new(0));

    let seen = statuses.clone();
    session.register_post_hook(move |response| seen.lock().unwrap().push(response.status_code()));
    let counter = pre_calls.clone();
    session.register_pre_hook(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    session.get("/foo").await.unwrap();

    assert_eq!(*statuses.lock().unwrap(), vec![200]);
    assert_eq!(pre_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_requests_share_token() {
    let session = session(FakeDispatcher::new(&[(401, ""), (200, "{}"), (200, "{}"), (200, "{}")]));

    session.get("/first").await.unwrap();
    let (a, b, c) = tokio::join!(session.get("/a"), session.get("/b"), session.get("/c"));

    for response in [a, b, c] {
        assert_eq!(response.unwrap().status(), StatusCode::OK);
    }
    assert_eq!(session.dispatcher().token_fetches(), 1);
    for request in &session.dispatcher().api_requests()[2..] {
        assert_eq!(request.headers().get(AUTHORIZATION).unwrap(), "Bearer foobarbaz");
    }
}

#[tokio::test]
async fn test_head_reauthenticates_once() {
    let session = session(FakeDispatcher::new(&[(401, ""), (200, "")]));

    let response = session.head("/business-units/find").await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(session.dispatcher().token_fetches(), 1);
    let requests = session.dispatcher().api_requests();
    assert!(requests.iter().all(|r| *r.method() == trustpilot::Method::HEAD));
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_explicit_authenticate() {
    let session = session(FakeDispatcher::new(&[]));

    assert_eq!(session.authenticate().await.unwrap(), "foobarbaz");
    assert_eq!(session.auth_headers().get("apikey").unwrap(), "something");
    assert!(session.dispatcher().api_requests().is_empty());
}
