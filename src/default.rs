//! Process-wide default sessions and free verb functions.
//!
//! The default sessions are built lazily from the environment on first
//! use. Front ends that resolve their own configuration install it with
//! `init_default_session(options)`, which never consults a half-configured
//! environment-built session first.

#[cfg(feature = "blocking")]
pub use self::blocking::{default_session, delete, get, head, init_default_session, options, patch, post, put};

#[cfg(feature = "async")]
pub use self::nonblocking::{default_async_session, init_default_async_session};

#[cfg(feature = "blocking")]
mod blocking {
    use std::sync::OnceLock;

    use crate::config::SessionOptions;
    use crate::error::Result;
    use crate::response::Response;
    use crate::session::Session;

    static DEFAULT_SESSION: OnceLock<Session> = OnceLock::new();

    /// The shared blocking session
    pub fn default_session() -> Result<&'static Session> {
        if let Some(session) = DEFAULT_SESSION.get() {
            return Ok(session);
        }
        let session = Session::new()?;
        Ok(DEFAULT_SESSION.get_or_init(|| session))
    }

    /// Configure the shared blocking session from `options`.
    ///
    /// Builds it from `options` when it does not exist yet, re-homes it
    /// otherwise.
    pub fn init_default_session(options: SessionOptions) -> Result<&'static Session> {
        if let Some(session) = DEFAULT_SESSION.get() {
            session.setup(options)?;
            return Ok(session);
        }

        let session = Session::with_options(options.clone())?;
        if DEFAULT_SESSION.set(session).is_err() {
            // Another thread installed one in the meantime.
            default_session()?.setup(options)?;
        }
        default_session()
    }

    /// GET `path` through the default session
    pub fn get(path: &str) -> Result<Response> {
        default_session()?.get(path)
    }

    /// DELETE `path` through the default session
    pub fn delete(path: &str) -> Result<Response> {
        default_session()?.delete(path)
    }

    /// HEAD `path` through the default session
    pub fn head(path: &str) -> Result<Response> {
        default_session()?.head(path)
    }

    /// OPTIONS `path` through the default session
    pub fn options(path: &str) -> Result<Response> {
        default_session()?.options(path)
    }

    /// POST `body` to `path` through the default session
    pub fn post(path: &str, body: impl Into<Vec<u8>>) -> Result<Response> {
        default_session()?.post(path, body)
    }

    /// PUT `body` to `path` through the default session
    pub fn put(path: &str, body: impl Into<Vec<u8>>) -> Result<Response> {
        default_session()?.put(path, body)
    }

    /// PATCH `body` to `path` through the default session
    pub fn patch(path: &str, body: impl Into<Vec<u8>>) -> Result<Response> {
        default_session()?.patch(path, body)
    }
}

#[cfg(feature = "async")]
mod nonblocking {
    use std::sync::OnceLock;

    use crate::async_session::AsyncSession;
    use crate::config::SessionOptions;
    use crate::error::Result;

    static DEFAULT_ASYNC_SESSION: OnceLock<AsyncSession> = OnceLock::new();

    /// The shared async session
    pub fn default_async_session() -> Result<&'static AsyncSession> {
        if let Some(session) = DEFAULT_ASYNC_SESSION.get() {
            return Ok(session);
        }
        let session = AsyncSession::new()?;
        Ok(DEFAULT_ASYNC_SESSION.get_or_init(|| session))
    }

    /// Configure the shared async session from `options`
    pub fn init_default_async_session(options: SessionOptions) -> Result<&'static AsyncSession> {
        if let Some(session) = DEFAULT_ASYNC_SESSION.get() {
            session.setup(options)?;
            return Ok(session);
        }

        let session = AsyncSession::with_options(options.clone())?;
        if DEFAULT_ASYNC_SESSION.set(session).is_err() {
            default_async_session()?.setup(options)?;
        }
        default_async_session()
    }
}
