//! HTTP client factory for relay requests.
//!
//! Every client carries the same User-Agent, `tcp_nodelay`, connect timeout
//! and pool settings. An overall request timeout is only set when the
//! caller asks for one.

use reqwest::Client;
use std::time::Duration;

/// User-Agent string for all relay requests
pub const USER_AGENT: &str = concat!("contact-terminal/", env!("CARGO_PKG_VERSION"));

/// Timeout for establishing the TCP connection (10 seconds)
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Idle pooled connections are dropped after this long so DNS is re-resolved.
pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Creates the client used for relay requests.
///
/// With `timeout` unset the request may wait on the relay indefinitely
/// once connected.
pub fn create_relay_client(timeout: Option<Duration>) -> Result<Client, String> {
    let mut builder = Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(CONNECT_TIMEOUT)
        .tcp_nodelay(true)
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .pool_max_idle_per_host(1);

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder
        .build()
        .map_err(|e| format!("Failed to build HTTP client: {e}"))
}
