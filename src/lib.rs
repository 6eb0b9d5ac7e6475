//! # trustpilot - Trustpilot API client for Rust
//!
//! A client for the Trustpilot REST API that takes care of authentication.
//! Requests are sent through a session which lazily obtains an OAuth2
//! bearer token, attaches it to every request and transparently
//! re-authenticates when the API answers 401 or 403.
//!
//! ## Features
//!
//! - Blocking [`Session`] and async [`AsyncSession`] sharing one protocol
//! - Client-credentials and password grants against the token issuer
//! - Exactly one re-authentication per request, so bad credentials never loop
//! - Relative paths resolved against the configured host and API version
//! - Configuration from explicit options or `TRUSTPILOT_*` environment variables
//! - Pre-request and post-response hooks
//!
//! ## Basic Usage
//!
//! ```no_run
//! use trustpilot::{Session, SessionOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Session::with_options(
//!         SessionOptions::new()
//!             .with_api_key("my-key")
//!             .with_api_secret("my-secret"),
//!     )?;
//!
//!     // Resolves to https://api.trustpilot.com/v1/business-units/find?name=example.com
//!     let response = session.get("/business-units/find?name=example.com")?;
//!     println!("{} {}", response.status(), response.text());
//!     Ok(())
//! }
//! ```
//!
//! ## Async Usage
//!
//! ```no_run
//! use trustpilot::{AsyncSession, SessionOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = AsyncSession::with_options(
//!     SessionOptions::new()
//!         .with_api_host("https://api.tp-staging.com")
//!         .with_credentials("username", "password"),
//! )?;
//!
//! let response = session.get("/foo/bar").await?;
//! let body: serde_json::Value = response.json()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Cargo features
//!
//! - `blocking` (default): [`Session`], [`BlockingDispatcher`] and the
//!   blocking default session
//! - `async` (default): [`AsyncSession`] and the async transport
//! - `cli`: the `trustpilot_api_client` command-line tool
//!
//! ## Environment
//!
//! Unset options fall back to `TRUSTPILOT_API_HOST`, `TRUSTPILOT_API_KEY`,
//! `TRUSTPILOT_API_SECRET`, `TRUSTPILOT_USERNAME`, `TRUSTPILOT_PASSWORD`,
//! `TRUSTPILOT_API_VERSION`, `TRUSTPILOT_API_TOKEN_ISSUER_PATH`,
//! `TRUSTPILOT_API_TOKEN_ISSUER_HOST` and `TRUSTPILOT_USER_AGENT`.

pub mod auth;
pub mod client;
pub mod config;
pub mod default;
pub mod dispatch;
pub mod error;
pub mod hooks;
pub mod normalize;
pub mod request;
pub mod response;
pub mod token;

#[cfg(feature = "blocking")]
pub mod session;

#[cfg(feature = "async")]
pub mod async_session;

mod state;

// Re-export main types for convenience
pub use auth::AuthState;
pub use config::{SessionConfig, SessionOptions};
pub use error::{AuthError, ConfigError, Error, Result};
pub use hooks::{PostResponseHook, PreRequestHook};
pub use normalize::normalize;
pub use request::PendingRequest;
pub use response::Response;
pub use token::access_token_request;

#[cfg(feature = "blocking")]
pub use default::{default_session, init_default_session};
#[cfg(feature = "blocking")]
pub use dispatch::{BlockingDispatcher, Dispatcher};
#[cfg(feature = "blocking")]
pub use session::Session;
#[cfg(feature = "blocking")]
pub use token::fetch_token;

#[cfg(feature = "async")]
pub use async_session::AsyncSession;
#[cfg(feature = "async")]
pub use default::{default_async_session, init_default_async_session};
#[cfg(feature = "async")]
pub use dispatch::{AsyncDispatcher, ClientDispatcher, ClientHandle, ResponseHandle};
#[cfg(feature = "async")]
pub use token::fetch_token_async;

// Re-export the HTTP types that appear in the public API
pub use reqwest::header;
pub use reqwest::{Method, StatusCode};
