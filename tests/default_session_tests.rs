#![cfg(feature = "blocking")]

//! The process-wide default session. Kept in its own test binary since it
//! mutates the process environment.

use trustpilot::config::ENV_API_HOST;
use trustpilot::{ConfigError, Error, SessionOptions};

#[test]
fn test_explicit_options_win_over_malformed_environment() {
    std::env::set_var(ENV_API_HOST, "not a url");

    // Built from the environment alone the default session cannot exist...
    assert!(matches!(
        trustpilot::default_session(),
        Err(Error::Config(ConfigError::InvalidHost(_)))
    ));

    // ...but explicit options are enough to build it.
    let session = trustpilot::init_default_session(
        SessionOptions::new()
            .with_api_host("https://api.tp-staging.com")
            .with_api_key("something"),
    )
    .unwrap();
    assert_eq!(session.config().api_host(), "https://api.tp-staging.com");

    // Later lookups return the configured session.
    let again = trustpilot::default_session().unwrap();
    assert!(std::ptr::eq(session, again));

    // Re-initializing re-homes the existing session in place.
    let rehomed = trustpilot::init_default_session(
        SessionOptions::new()
            .with_api_host("https://api.trustpilot.com")
            .with_access_token("preissued"),
    )
    .unwrap();
    assert!(std::ptr::eq(session, rehomed));
    assert_eq!(rehomed.config().api_host(), "https://api.trustpilot.com");
    assert_eq!(rehomed.access_token().as_deref(), Some("preissued"));

    std::env::remove_var(ENV_API_HOST);
}
