//! Client settings.
//!
//! Timing knobs for the pacing gate, retry policy and HTTP transport.

use std::time::Duration;

use crate::retry::RetryStrategy;

/// User agent string for `ApiExplorer`.
const USER_AGENT: &str = concat!("ApiExplorer/", env!("CARGO_PKG_VERSION"));

/// Settings for the API client.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Minimum time between the end of one request and the start of the next.
    pub min_request_interval: Duration,
    /// Attempts per request, including the first. A budget of 3 means one
    /// request and at most two retries.
    pub max_attempts: u32,
    /// Backoff after the first failed attempt; doubles per attempt.
    pub backoff_base: Duration,
    /// Upper bound for a single backoff. The doubling only reaches it after
    /// six failed attempts, so the default budget never hits it; larger
    /// budgets wait at most this long between attempts.
    pub max_backoff: Duration,
    /// Transport timeout for a single attempt.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            min_request_interval: Duration::from_millis(1000),
            max_attempts: 3,
            backoff_base: Duration::from_millis(1000),
            max_backoff: Duration::from_secs(60),
            timeout: Duration::from_secs(30),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl ClientSettings {
    /// Creates default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum request interval.
    pub fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }

    /// Sets the attempt budget. At least one attempt is always made.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Sets the backoff base.
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    /// Sets the upper bound for a single backoff.
    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    /// Sets the transport timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the retry strategy described by these settings.
    pub fn retry_strategy(&self) -> RetryStrategy {
        RetryStrategy::new(self.max_attempts)
            .with_base_delay(self.backoff_base)
            .with_max_delay(self.max_backoff)
    }
}
