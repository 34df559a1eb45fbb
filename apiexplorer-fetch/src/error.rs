//! Fetch error types.

use apiexplorer_core::{ApiResult, CoreError, FailureKind};
use thiserror::Error;

/// Error type for client operations.
///
/// HTTP failures (401, 429, 500, ...) are not errors: they are classified
/// into an [`ApiResult`]. The public client operations also report
/// configuration problems as results (see [`FetchError::into_result`]), so
/// only transport failures that outlived the retry budget escape them.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL missing or not absolute.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Auth strategy produced a header that cannot be sent.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Core error.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl FetchError {
    /// Returns true for transport failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_))
    }

    /// Converts a configuration error into a failure result.
    ///
    /// Transport errors are returned unchanged.
    pub fn into_result(self) -> Result<ApiResult, Self> {
        if self.is_transport() {
            return Err(self);
        }
        Ok(ApiResult::failure(
            FailureKind::Configuration,
            None,
            self.to_string(),
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_become_results() {
        let result = FetchError::InvalidHeader("Bad Name".to_string())
            .into_result()
            .unwrap();
        assert_eq!(result.failure_kind(), Some(FailureKind::Configuration));
        assert_eq!(result.status(), None);
        assert_eq!(result.message(), "Invalid header: Bad Name");

        let result = FetchError::InvalidUrl("base URL is not configured".to_string())
            .into_result()
            .unwrap();
        assert_eq!(result.failure_kind(), Some(FailureKind::Configuration));
    }
}
