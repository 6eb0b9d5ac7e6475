use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use reqwest::Method;
use serde_json::Value;

use crate::auth::credential_header;
use crate::config::SessionConfig;
use crate::error::{AuthError, Error, Result};
use crate::request::PendingRequest;
use crate::response::Response;

/// Build the token issuer request for `config`.
///
/// Uses the password grant when both username and password are configured,
/// the client-credentials grant otherwise. Fails with
/// [`AuthError::MissingApiKey`] when no api key is configured.
pub fn access_token_request(config: &SessionConfig) -> Result<PendingRequest> {
    let api_key = config.api_key().ok_or(AuthError::MissingApiKey)?;
    let api_secret = config.api_secret().unwrap_or_default();
    let basic = STANDARD.encode(format!("{}:{}", api_key, api_secret));

    let request = PendingRequest::new(Method::POST, config.token_issuer_url())
        .with_header(AUTHORIZATION, credential_header(&format!("Basic {}", basic), "api key and secret")?)
        .with_header(USER_AGENT, credential_header(config.user_agent(), "user agent")?);

    let request = match (config.username(), config.password()) {
        (Some(username), Some(password)) => request.with_form(&[
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
        ]),
        _ => request.with_form(&[("grant_type", "client_credentials")]),
    };

    Ok(request)
}

/// Fetch a bearer token with one POST to the token issuer. Never retries.
#[cfg(feature = "blocking")]
pub fn fetch_token<D: crate::dispatch::Dispatcher + ?Sized>(dispatcher: &D, config: &SessionConfig) -> Result<String> {
    let request = access_token_request(config)?;
    tracing::debug!("Requesting access token from {}", request.url());

    let response = dispatcher.dispatch(&request).map_err(issuer_unreachable)?;
    token_from_response(&response)
}

/// Async counterpart of [`fetch_token`]
#[cfg(feature = "async")]
pub async fn fetch_token_async<D>(dispatcher: &D, config: &SessionConfig) -> Result<String>
where
    D: crate::dispatch::AsyncDispatcher + ?Sized,
{
    use crate::dispatch::ResponseHandle;

    let request = access_token_request(config)?;
    tracing::debug!("Requesting access token from {}", request.url());

    let handle = dispatcher.dispatch(&request).await.map_err(issuer_unreachable)?;
    let response = handle.read().await.map_err(issuer_unreachable)?;
    token_from_response(&response)
}

fn issuer_unreachable(err: Error) -> Error {
    tracing::error!("Token issuer request failed: {}", err);
    AuthError::Unreachable(Box::new(err)).into()
}

/// Extract the access token from a token issuer response
fn token_from_response(response: &Response) -> Result<String> {
    if !response.is_success() {
        tracing::warn!("Token issuer rejected credentials with {}", response.status());
        return Err(AuthError::Rejected {
            status: response.status_code(),
            body: response.text(),
        }
        .into());
    }

    let body: Value = serde_json::from_slice(response.bytes()).map_err(AuthError::InvalidResponse)?;
    let token = body
        .get("access_token")
        .and_then(Value::as_str)
        .ok_or(AuthError::MissingAccessToken)?;

    Ok(token.to_string())
}
