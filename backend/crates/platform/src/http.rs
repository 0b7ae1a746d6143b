//! Upstream HTTP Client
//!
//! Common construction for clients talking to third-party APIs.

use std::time::Duration;

/// User-Agent sent on every upstream request
///
/// Some public APIs reject requests without a browser-looking UA.
pub const UPSTREAM_USER_AGENT: &str = "Mozilla/5.0 (compatible; ChessLeaderboard/1.0)";

/// Default upstream request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Build a reqwest client for upstream API calls
///
/// ## Arguments
/// * `timeout` - per-request timeout applied to every call
///
/// ## Returns
/// * `Ok(Client)` - configured client (rustls, UA header, timeout)
/// * `Err(reqwest::Error)` - TLS backend initialization failed
pub fn upstream_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(UPSTREAM_USER_AGENT)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_client_builds() {
        assert!(upstream_client(DEFAULT_REQUEST_TIMEOUT).is_ok());
    }
}
