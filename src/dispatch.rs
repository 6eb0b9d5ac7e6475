//! Transport seam: each dispatcher performs exactly one HTTP call.
//!
//! Sessions own the authentication protocol and never talk to `reqwest`
//! directly, so the transport can be swapped (for instance by a counting
//! fake in tests).

use crate::error::Result;
use crate::request::PendingRequest;
use crate::response::Response;

/// Blocking transport: returns once the whole response has been read
#[cfg(feature = "blocking")]
pub trait Dispatcher: Send + Sync {
    fn dispatch(&self, request: &PendingRequest) -> Result<Response>;
}

/// [`Dispatcher`] backed by `reqwest::blocking`
#[cfg(feature = "blocking")]
#[derive(Debug, Clone)]
pub struct BlockingDispatcher {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "blocking")]
impl BlockingDispatcher {
    pub fn new() -> Result<Self> {
        Ok(Self::with_client(crate::client::create_blocking_client()?))
    }

    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        BlockingDispatcher { client }
    }
}

#[cfg(feature = "blocking")]
impl Dispatcher for BlockingDispatcher {
    fn dispatch(&self, request: &PendingRequest) -> Result<Response> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.url())
            .headers(request.headers().clone());
        if let Some(body) = request.body() {
            builder = builder.body(body.to_vec());
        }

        let start = std::time::Instant::now();
        let http_response = builder.send()?;
        let status = http_response.status();
        let url = http_response.url().to_string();
        let headers = http_response.headers().clone();
        let body = http_response.bytes()?;

        tracing::debug!(
            "{} {} => {} in {:?}",
            request.method(),
            request.url(),
            status,
            start.elapsed()
        );

        Ok(Response::new(status, url, headers, body.to_vec()))
    }
}

#[cfg(feature = "async")]
pub use self::nonblocking::{AsyncDispatcher, ClientDispatcher, ClientHandle, ResponseHandle};

#[cfg(feature = "async")]
mod nonblocking {
    use super::*;
    use async_trait::async_trait;
    use reqwest::header::HeaderMap;
    use reqwest::StatusCode;

    /// A response whose headers have arrived but whose body may still be
    /// on the wire.
    ///
    /// The handle owns the underlying connection; dropping it (or consuming
    /// it with [`ResponseHandle::read`]) releases the connection.
    #[async_trait]
    pub trait ResponseHandle: Send {
        fn status(&self) -> StatusCode;
        fn url(&self) -> &str;
        fn headers(&self) -> &HeaderMap;

        /// Read the remaining body and release the connection
        async fn read(self) -> Result<Response>;
    }

    /// Async transport: resolves once response headers are available
    #[async_trait]
    pub trait AsyncDispatcher: Send + Sync {
        type Handle: ResponseHandle;

        async fn dispatch(&self, request: &PendingRequest) -> Result<Self::Handle>;
    }

    /// [`AsyncDispatcher`] backed by an async `reqwest::Client`
    #[derive(Debug, Clone)]
    pub struct ClientDispatcher {
        client: reqwest::Client,
    }

    impl ClientDispatcher {
        pub fn new() -> Result<Self> {
            Ok(Self::with_client(crate::client::create_async_client()?))
        }

        pub fn with_client(client: reqwest::Client) -> Self {
            ClientDispatcher { client }
        }
    }

    /// Streaming response from [`ClientDispatcher`]
    #[derive(Debug)]
    pub struct ClientHandle {
        response: reqwest::Response,
    }

    #[async_trait]
    impl ResponseHandle for ClientHandle {
        fn status(&self) -> StatusCode {
            self.response.status()
        }

        fn url(&self) -> &str {
            self.response.url().as_str()
        }

        fn headers(&self) -> &HeaderMap {
            self.response.headers()
        }

        async fn read(self) -> Result<Response> {
            let status = self.response.status();
            let url = self.response.url().to_string();
            let headers = self.response.headers().clone();
            let body = self.response.bytes().await?;
            Ok(Response::new(status, url, headers, body.to_vec()))
        }
    }

    #[async_trait]
    impl AsyncDispatcher for ClientDispatcher {
        type Handle = ClientHandle;

        async fn dispatch(&self, request: &PendingRequest) -> Result<ClientHandle> {
            let mut builder = self
                .client
                .request(request.method().clone(), request.url())
                .headers(request.headers().clone());
            if let Some(body) = request.body() {
                builder = builder.body(body.to_vec());
            }

            let response = builder.send().await?;
            tracing::debug!("{} {} => {}", request.method(), request.url(), response.status());

            Ok(ClientHandle { response })
        }
    }
}
