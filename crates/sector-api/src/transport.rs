// Transport configuration for building reqwest::Client instances.
//
// Redirects are disabled at the builder: the login flow signals success
// with a 3xx carrying the session cookie, and authenticated calls signal
// an expired session by redirecting to the login page. Both must be
// observed, not followed.

use std::time::Duration;

use crate::error::Error;

/// Transport settings for the HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .user_agent("sector-api/0.1.0")
            .build()
            .map_err(|e| Error::communication(format!("failed to build HTTP client: {e}")))
    }
}
