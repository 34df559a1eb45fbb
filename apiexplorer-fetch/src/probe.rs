//! Auth-strategy probe.
//!
//! Tries a list of strategies against the base URL, one request each and
//! without retries, and adopts the first that gets a 2xx response.

use std::time::Instant;

use apiexplorer_core::AuthStrategy;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::client::ApiClient;
use crate::error::FetchError;
use crate::retry::RetryStrategy;

/// A strategy to try, with a display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeCandidate {
    /// Display label.
    pub label: String,
    /// Strategy to try.
    pub strategy: AuthStrategy,
}

impl ProbeCandidate {
    /// Creates a candidate.
    pub fn new(label: impl Into<String>, strategy: AuthStrategy) -> Self {
        Self {
            label: label.into(),
            strategy,
        }
    }
}

/// The standard candidate list, in probe order.
pub fn default_candidates() -> Vec<ProbeCandidate> {
    vec![
        ProbeCandidate::new("Token without prefix", AuthStrategy::token_only()),
        ProbeCandidate::new("Bearer token", AuthStrategy::bearer()),
        ProbeCandidate::new("Token header", AuthStrategy::token_header()),
        ProbeCandidate::new("API key", AuthStrategy::api_key()),
        ProbeCandidate::new("No authentication", AuthStrategy::None),
        ProbeCandidate::new("Token as URL parameter", AuthStrategy::url_param("token")),
        ProbeCandidate::new("API key as URL parameter", AuthStrategy::url_param("api_key")),
    ]
}

/// Outcome of one probe request.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeAttempt {
    /// Candidate label.
    pub label: String,
    /// Strategy tried.
    pub strategy: AuthStrategy,
    /// HTTP status, if a response was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Whether the response was 2xx.
    pub success: bool,
    /// Transport or configuration error text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Response time in milliseconds.
    pub response_time_ms: u64,
}

/// Result of a full probe run.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    /// One entry per candidate, in order.
    pub attempts: Vec<ProbeAttempt>,
    /// The adopted strategy, if any candidate succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adopted: Option<AuthStrategy>,
    /// When the probe ran.
    pub probed_at: DateTime<Utc>,
}

impl ProbeReport {
    /// Returns true if no candidate succeeded.
    pub fn all_failed(&self) -> bool {
        self.adopted.is_none()
    }

    /// Returns the first successful attempt.
    pub fn first_success(&self) -> Option<&ProbeAttempt> {
        self.attempts.iter().find(|a| a.success)
    }
}

impl ApiClient {
    /// Probes `candidates` against the base URL.
    ///
    /// Requests are sequential and go through the pacing gate. Every
    /// candidate is tried so the report is complete; the first success is
    /// adopted. Fails only if no base URL is configured.
    #[instrument(skip(self, candidates), fields(candidates = candidates.len()))]
    pub async fn probe_auth(
        &mut self,
        candidates: &[ProbeCandidate],
    ) -> Result<ProbeReport, FetchError> {
        let base = self.config().base_url.clone();
        if base.is_empty() {
            return Err(FetchError::InvalidUrl("base URL is not configured".to_string()));
        }

        let retry = RetryStrategy::no_retry();
        let mut attempts = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            debug!(label = %candidate.label, strategy = %candidate.strategy, "Probing");
            let start = Instant::now();
            let outcome = self
                .get_with_strategy(&base, &candidate.strategy, &retry)
                .await;
            let response_time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            let attempt = match outcome {
                Ok(exchange) => ProbeAttempt {
                    label: candidate.label.clone(),
                    strategy: candidate.strategy.clone(),
                    status: Some(exchange.status.as_u16()),
                    success: exchange.status.is_success(),
                    error: None,
                    response_time_ms,
                },
                Err(e) => ProbeAttempt {
                    label: candidate.label.clone(),
                    strategy: candidate.strategy.clone(),
                    status: None,
                    success: false,
                    error: Some(e.to_string()),
                    response_time_ms,
                },
            };
            debug!(label = %attempt.label, status = ?attempt.status, success = attempt.success, "Probe attempt done");
            attempts.push(attempt);
        }

        let adopted = attempts
            .iter()
            .find(|a| a.success)
            .map(|a| a.strategy.clone());

        match &adopted {
            Some(strategy) => self.adopt_strategy(strategy.clone()),
            None => warn!("No auth strategy succeeded"),
        }
        info!(adopted = adopted.is_some(), "Auth probe finished");

        Ok(ProbeReport {
            attempts,
            adopted,
            probed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiexplorer_core::StrategyKind;

    #[test]
    fn test_default_candidate_order() {
        let kinds: Vec<StrategyKind> = default_candidates()
            .iter()
            .map(|c| c.strategy.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                StrategyKind::TokenOnly,
                StrategyKind::Bearer,
                StrategyKind::TokenHeader,
                StrategyKind::ApiKey,
                StrategyKind::None,
                StrategyKind::UrlParam,
                StrategyKind::UrlParam,
            ]
        );
        assert_eq!(default_candidates()[6].strategy.query_param(), Some("api_key"));
    }
}
