use crate::error::{ConfigError, Result};
use url::Url;

/// Production API host used when nothing else is configured
pub const DEFAULT_API_HOST: &str = "https://api.trustpilot.com";
/// API version used when nothing else is configured
pub const DEFAULT_API_VERSION: &str = "v1";
/// Path of the OAuth token endpoint, relative to `{issuer_host}/{version}`
pub const DEFAULT_TOKEN_ISSUER_PATH: &str = "oauth/oauth-business-users-for-applications/accesstoken";

const SCOPE: &str = "external";

pub const ENV_API_HOST: &str = "TRUSTPILOT_API_HOST";
pub const ENV_API_KEY: &str = "TRUSTPILOT_API_KEY";
pub const ENV_API_SECRET: &str = "TRUSTPILOT_API_SECRET";
pub const ENV_USERNAME: &str = "TRUSTPILOT_USERNAME";
pub const ENV_PASSWORD: &str = "TRUSTPILOT_PASSWORD";
pub const ENV_API_VERSION: &str = "TRUSTPILOT_API_VERSION";
pub const ENV_TOKEN_ISSUER_PATH: &str = "TRUSTPILOT_API_TOKEN_ISSUER_PATH";
pub const ENV_TOKEN_ISSUER_HOST: &str = "TRUSTPILOT_API_TOKEN_ISSUER_HOST";
pub const ENV_USER_AGENT: &str = "TRUSTPILOT_USER_AGENT";

/// Generate the default User-Agent string.
///
/// Encodes the client scope, crate version, version of the compiler that
/// built the crate and operating system, e.g.
/// `rust-trustpilot-client?scope=external&version=0.1.0&rust-version=1.82.0&os=linux`.
pub fn default_user_agent() -> String {
    format!(
        "rust-trustpilot-client?scope={}&version={}&rust-version={}&os={}",
        SCOPE,
        env!("CARGO_PKG_VERSION"),
        env!("TRUSTPILOT_RUSTC_VERSION"),
        std::env::consts::OS,
    )
}

/// Options accepted when creating or re-homing a session.
///
/// Every field is optional; unset fields fall back to their environment
/// variable and then to a built-in default when resolved.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub api_host: Option<String>,
    pub api_key: Option<String>,
    pub api_version: Option<String>,
    pub api_secret: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Previously issued bearer token to start the session with
    pub access_token: Option<String>,
    pub token_issuer_path: Option<String>,
    pub token_issuer_host: Option<String>,
    pub user_agent: Option<String>,
}

impl SessionOptions {
    /// Create empty options; everything resolves from the environment
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_host(mut self, api_host: impl Into<String>) -> Self {
        self.api_host = Some(api_host.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    pub fn with_api_secret(mut self, api_secret: impl Into<String>) -> Self {
        self.api_secret = Some(api_secret.into());
        self
    }

    /// Set end-user credentials, switching token requests to the password grant
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    pub fn with_token_issuer_path(mut self, path: impl Into<String>) -> Self {
        self.token_issuer_path = Some(path.into());
        self
    }

    pub fn with_token_issuer_host(mut self, host: impl Into<String>) -> Self {
        self.token_issuer_host = Some(host.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Resolve against the process environment
    pub fn resolve(self) -> Result<SessionConfig> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve using `lookup` as the environment.
    ///
    /// Empty values count as unset at every level.
    pub fn resolve_with<F>(self, lookup: F) -> Result<SessionConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |explicit: Option<String>, var: &str| {
            non_empty(explicit).or_else(|| non_empty(lookup(var)))
        };

        let api_host = pick(self.api_host, ENV_API_HOST).unwrap_or_else(|| DEFAULT_API_HOST.to_string());
        validate_host(&api_host)?;

        let token_issuer_host = pick(self.token_issuer_host, ENV_TOKEN_ISSUER_HOST).unwrap_or_else(|| api_host.clone());
        validate_host(&token_issuer_host)?;

        let config = SessionConfig {
            api_key: pick(self.api_key, ENV_API_KEY),
            api_secret: pick(self.api_secret, ENV_API_SECRET),
            username: pick(self.username, ENV_USERNAME),
            password: pick(self.password, ENV_PASSWORD),
            api_version: pick(self.api_version, ENV_API_VERSION)
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            token_issuer_path: pick(self.token_issuer_path, ENV_TOKEN_ISSUER_PATH)
                .unwrap_or_else(|| DEFAULT_TOKEN_ISSUER_PATH.to_string()),
            user_agent: pick(self.user_agent, ENV_USER_AGENT).unwrap_or_else(default_user_agent),
            access_token: non_empty(self.access_token),
            api_host,
            token_issuer_host,
        };

        if config.api_key.is_none() {
            tracing::debug!("No api key configured, token requests will fail until one is set");
        }

        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn validate_host(host: &str) -> std::result::Result<(), ConfigError> {
    let has_scheme = host.starts_with("http://") || host.starts_with("https://");
    if !has_scheme || Url::parse(host).is_err() {
        return Err(ConfigError::InvalidHost(host.to_string()));
    }
    Ok(())
}

/// Resolved, immutable session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    api_host: String,
    api_version: String,
    api_key: Option<String>,
    api_secret: Option<String>,
    username: Option<String>,
    password: Option<String>,
    access_token: Option<String>,
    token_issuer_host: String,
    token_issuer_path: String,
    user_agent: String,
}

impl SessionConfig {
    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn api_secret(&self) -> Option<&str> {
        self.api_secret.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn token_issuer_host(&self) -> &str {
        &self.token_issuer_host
    }

    pub fn token_issuer_path(&self) -> &str {
        &self.token_issuer_path
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Absolute URL of the token endpoint
    pub fn token_issuer_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.token_issuer_host.trim_end_matches('/'),
            self.api_version.trim_end_matches('/'),
            self.token_issuer_path
        )
    }
}
