//! Uniform result shape of client operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Failure Kind
// ============================================================================

/// Why a request did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// HTTP 401/403: the credential was rejected.
    Authentication,
    /// HTTP 429 after the retry budget was spent.
    RateLimited {
        /// Suggested wait from `Retry-After`, in seconds.
        retry_after_secs: Option<u64>,
    },
    /// Any other non-2xx status.
    Http,
    /// The operation needs a prior successful connect.
    NotConnected,
    /// No request was sent: the base URL or credential cannot be used.
    Configuration,
}

impl FailureKind {
    /// Returns a short label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::RateLimited { .. } => "rate limited",
            Self::Http => "http",
            Self::NotConnected => "not connected",
            Self::Configuration => "configuration",
        }
    }
}

// ============================================================================
// Api Result
// ============================================================================

/// Outcome of a connect, status probe, or resource fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ApiResult {
    /// 2xx response.
    Success {
        /// HTTP status.
        status: u16,
        /// Parsed body, when the operation returns data.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
        /// Human-readable summary.
        message: String,
    },
    /// Classified failure.
    Failure {
        /// Failure class.
        kind: FailureKind,
        /// HTTP status, if a response was received.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
        /// Human-readable explanation.
        message: String,
    },
}

impl ApiResult {
    /// Creates a success result.
    pub fn success(status: u16, data: Option<Value>, message: impl Into<String>) -> Self {
        Self::Success {
            status,
            data,
            message: message.into(),
        }
    }

    /// Creates a failure result.
    pub fn failure(kind: FailureKind, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            status,
            message: message.into(),
        }
    }

    /// Creates the result returned when no connection is active.
    pub fn not_connected() -> Self {
        Self::failure(
            FailureKind::NotConnected,
            None,
            "No active connection to the API",
        )
    }

    /// Returns true for a 2xx outcome.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the HTTP status, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Success { status, .. } => Some(*status),
            Self::Failure { status, .. } => *status,
        }
    }

    /// Returns the data of a successful fetch.
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Success { data, .. } => data.as_ref(),
            Self::Failure { .. } => None,
        }
    }

    /// Consumes the result, returning its data.
    pub fn into_data(self) -> Option<Value> {
        match self {
            Self::Success { data, .. } => data,
            Self::Failure { .. } => None,
        }
    }

    /// Returns the message.
    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. } | Self::Failure { message, .. } => message,
        }
    }

    /// Returns the failure kind, if this is a failure.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }

    /// Returns true if the credential was rejected.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.failure_kind(), Some(FailureKind::Authentication))
    }

    /// Returns true if the request was rate limited.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.failure_kind(), Some(FailureKind::RateLimited { .. }))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors() {
        let ok = ApiResult::success(200, Some(json!([1, 2])), "ok");
        assert!(ok.is_success());
        assert_eq!(ok.status(), Some(200));
        assert_eq!(ok.data(), Some(&json!([1, 2])));
        assert_eq!(ok.failure_kind(), None);

        let limited = ApiResult::failure(
            FailureKind::RateLimited {
                retry_after_secs: Some(30),
            },
            Some(429),
            "slow down",
        );
        assert!(limited.is_rate_limited());
        assert!(!limited.is_auth_failure());
        assert_eq!(limited.data(), None);
        assert_eq!(limited.message(), "slow down");

        let offline = ApiResult::not_connected();
        assert_eq!(offline.status(), None);
        assert_eq!(offline.failure_kind(), Some(FailureKind::NotConnected));
        assert_eq!(FailureKind::Configuration.label(), "configuration");
    }
}
