use crate::error::Result;
use std::time::Duration;

const POOL_MAX_IDLE_PER_HOST: usize = 50;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Create the blocking HTTP client used by [`crate::BlockingDispatcher`]
/// with connection pooling and timeouts
#[cfg(feature = "blocking")]
pub fn create_blocking_client() -> Result<reqwest::blocking::Client> {
    let client = reqwest::blocking::ClientBuilder::new()
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?;
    Ok(client)
}

/// Create the async HTTP client used by [`crate::ClientDispatcher`]
#[cfg(feature = "async")]
pub fn create_async_client() -> Result<reqwest::Client> {
    let client = reqwest::ClientBuilder::new()
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?;
    Ok(client)
}
