//! Pacing gate for outbound requests.
//!
//! Enforces a minimum interval between the end of one request and the start
//! of the next, so bursts of calls do not trip upstream rate limits.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::debug;

/// Minimum-interval throttle applied before every request.
#[derive(Debug, Clone)]
pub struct PacingGate {
    min_interval: Duration,
    last_finished: Option<Instant>,
}

impl PacingGate {
    /// Creates a gate with the given minimum interval.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_finished: None,
        }
    }

    /// Returns the configured interval.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Returns how long a request issued at `now` has to wait.
    pub fn delay_at(&self, now: Instant) -> Duration {
        match self.last_finished {
            Some(last) => self
                .min_interval
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Sleeps until the next request may be issued.
    pub async fn wait(&self) {
        let delay = self.delay_at(Instant::now());
        if !delay.is_zero() {
            debug!(wait_ms = delay.as_millis(), "Pacing request");
            sleep(delay).await;
        }
    }

    /// Records that a request just finished.
    pub fn mark_finished(&mut self) {
        self.last_finished = Some(Instant::now());
    }
}

impl Default for PacingGate {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}
