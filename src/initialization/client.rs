//! HTTP client initialization.

use reqwest::ClientBuilder;

use crate::config::{DEFAULT_USER_AGENT, FETCH_TIMEOUT};
use crate::error_handling::InitializationError;

/// Initializes the HTTP client used by the crawl engine.
///
/// Creates a `reqwest::Client` configured with:
/// - Browser-like User-Agent header
/// - 10 second request timeout
/// - Redirect following enabled (reqwest default, up to 10 hops)
/// - Rustls TLS backend
///
/// The client is cheap to clone; one instance serves every crawl.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation
/// fails.
pub fn init_client() -> Result<reqwest::Client, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(FETCH_TIMEOUT)
        .user_agent(DEFAULT_USER_AGENT)
        .build()?;
    Ok(client)
}
