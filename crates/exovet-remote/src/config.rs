//! Remote endpoint configuration.

use std::time::Duration;

/// Default bound on one authoritative call, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Deployment knobs for the delegated path.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Full URL of the authoritative classification endpoint.
    pub endpoint: String,
    /// Bound on a single attempt; there are no internal retries.
    pub timeout: Duration,
    /// Optional bearer credential for the endpoint.
    pub api_key: Option<String>,
    /// Whether a failed authoritative call may degrade to the local
    /// heuristic. Off by default: degradation is an explicit opt-in.
    pub fallback_enabled: bool,
}

impl RemoteConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            api_key: None,
            fallback_enabled: false,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback_enabled = enabled;
        self
    }
}
