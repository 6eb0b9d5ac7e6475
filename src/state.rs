use crate::auth::AuthState;
use crate::config::SessionConfig;
use crate::error::Result;
use crate::hooks::Hooks;
use crate::normalize::normalize;
use crate::request::PendingRequest;
use parking_lot::RwLock;
use reqwest::header::HeaderMap;
use std::sync::Arc;

/// State shared by the blocking and async sessions: configuration,
/// authentication and hooks. Locks are only held for the duration of a
/// copy or a swap, never across I/O.
#[derive(Debug)]
pub(crate) struct SessionState {
    config: RwLock<Arc<SessionConfig>>,
    auth: RwLock<AuthState>,
    hooks: Hooks,
}

impl SessionState {
    pub(crate) fn new(config: SessionConfig) -> Result<Self> {
        let auth = AuthState::initial(&config)?;
        Ok(SessionState {
            config: RwLock::new(Arc::new(config)),
            auth: RwLock::new(auth),
            hooks: Hooks::default(),
        })
    }

    pub(crate) fn config(&self) -> Arc<SessionConfig> {
        self.config.read().clone()
    }

    /// Replace the configuration and reset authentication to match it
    pub(crate) fn reconfigure(&self, config: SessionConfig) -> Result<()> {
        let auth = AuthState::initial(&config)?;
        let mut config_slot = self.config.write();
        let mut auth_slot = self.auth.write();
        *config_slot = Arc::new(config);
        *auth_slot = auth;
        Ok(())
    }

    pub(crate) fn auth_headers(&self) -> HeaderMap {
        self.auth.read().headers().clone()
    }

    pub(crate) fn access_token(&self) -> Option<String> {
        self.auth.read().access_token().map(str::to_string)
    }

    /// Swap in a freshly issued token together with its headers
    pub(crate) fn store_token(&self, token: String, config: &SessionConfig) -> Result<()> {
        let auth = AuthState::authenticated(token, config)?;
        *self.auth.write() = auth;
        Ok(())
    }

    pub(crate) fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Resolve the request URL and run pre-request hooks
    pub(crate) fn prepare(&self, mut request: PendingRequest) -> PendingRequest {
        let config = self.config();
        let url = normalize(request.url(), config.api_host(), config.api_version());
        request.set_url(url);
        self.hooks.run_pre(&mut request);
        request
    }
}
