//! Connection configuration.
//!
//! The connection config is mutated only through its validating setters, so
//! the stored base URL never ends in a slash and the stored token never
//! carries a `Bearer ` prefix.

use serde::{Deserialize, Serialize};
use url::Url;

use super::auth::{AuthStrategy, DEFAULT_AUTH_HEADER, DEFAULT_TOKEN_HEADER};

/// Default endpoint used by the status probe.
pub const DEFAULT_STATUS_ENDPOINT: &str = "status";

/// Resource names offered before anything has been fetched.
pub const DEFAULT_RESOURCES: &[&str] = &["productos", "listado-productos", "productoimagenes"];

// ============================================================================
// Token Prefix
// ============================================================================

/// Prefix placed before the token in the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TokenPrefix {
    /// Bare token.
    #[default]
    #[serde(rename = "")]
    None,
    /// `Bearer <token>`.
    #[serde(rename = "Bearer ")]
    Bearer,
}

impl TokenPrefix {
    /// Returns the literal prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Bearer => "Bearer ",
        }
    }
}

// ============================================================================
// Connection Config
// ============================================================================

/// Everything needed to talk to one API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionConfig {
    /// Absolute base URL, without trailing slash.
    #[serde(rename = "apiUrl")]
    pub base_url: String,

    /// Bare credential.
    #[serde(rename = "apiToken")]
    pub token: String,

    /// Prefix for the `Authorization` header.
    pub token_prefix: TokenPrefix,

    /// Send the token in a custom `token` header instead of `Authorization`.
    pub use_token_header: bool,

    /// Endpoint used by the status probe.
    pub status_endpoint: String,

    /// Strategy adopted by the auth probe. Overrides the token format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_strategy: Option<AuthStrategy>,

    /// Known resource names.
    pub resources: Vec<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: String::new(),
            token_prefix: TokenPrefix::None,
            use_token_header: false,
            status_endpoint: DEFAULT_STATUS_ENDPOINT.to_string(),
            auth_strategy: None,
            resources: DEFAULT_RESOURCES.iter().map(|r| (*r).to_string()).collect(),
        }
    }
}

impl ConnectionConfig {
    /// Sets the base URL.
    ///
    /// Returns `false` and leaves the config unchanged if `url` is not an
    /// absolute URL. Trailing slashes are stripped.
    pub fn set_base_url(&mut self, url: &str) -> bool {
        let url = url.trim();
        if url.is_empty() || Url::parse(url).is_err() {
            return false;
        }
        self.base_url = url.trim_end_matches('/').to_string();
        true
    }

    /// Sets the token.
    ///
    /// Returns `false` for empty or whitespace-only input. A leading
    /// `Bearer ` is removed so the stored value is always the bare credential.
    pub fn set_token(&mut self, token: &str) -> bool {
        let token = token.trim();
        let bare = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        if bare.is_empty() {
            return false;
        }
        self.token = bare.to_string();
        true
    }

    /// Selects between the `token` header and `Authorization: <prefix><token>`.
    ///
    /// Clears any strategy adopted by the auth probe.
    pub fn set_token_format(&mut self, use_bearer: bool, use_token_header: bool) {
        self.token_prefix = if use_bearer {
            TokenPrefix::Bearer
        } else {
            TokenPrefix::None
        };
        self.use_token_header = use_token_header;
        self.auth_strategy = None;
    }

    /// Sets the status endpoint. Empty input is ignored.
    pub fn set_status_endpoint(&mut self, endpoint: &str) -> bool {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return false;
        }
        self.status_endpoint = endpoint.to_string();
        true
    }

    /// Adopts a strategy found by the auth probe.
    pub fn adopt_strategy(&mut self, strategy: AuthStrategy) {
        self.auth_strategy = Some(strategy);
    }

    /// Returns the strategy outgoing requests use.
    pub fn effective_strategy(&self) -> AuthStrategy {
        if let Some(strategy) = &self.auth_strategy {
            return strategy.clone();
        }
        if self.use_token_header {
            return AuthStrategy::TokenHeader {
                header: DEFAULT_TOKEN_HEADER.to_string(),
            };
        }
        match self.token_prefix {
            TokenPrefix::None => AuthStrategy::TokenOnly {
                header: DEFAULT_AUTH_HEADER.to_string(),
            },
            TokenPrefix::Bearer => AuthStrategy::Bearer {
                header: DEFAULT_AUTH_HEADER.to_string(),
            },
        }
    }

    /// Returns true if both a base URL and a token are present.
    pub fn is_complete(&self) -> bool {
        !self.base_url.is_empty() && !self.token.is_empty()
    }

    /// Resolves `endpoint` against the base URL.
    ///
    /// Absolute `http(s)` URLs are returned unchanged; anything else is
    /// joined to the base URL with exactly one slash.
    pub fn resolve(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        let path = endpoint.trim_start_matches('/');
        if path.is_empty() {
            return self.base_url.clone();
        }
        format!("{}/{}", self.base_url, path)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_base_url_strips_trailing_slash() {
        let mut config = ConnectionConfig::default();
        assert!(config.set_base_url("https://api.example.com/v1/"));
        assert_eq!(config.base_url, "https://api.example.com/v1");

        assert!(config.set_base_url("http://localhost:8080//"));
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_set_base_url_rejects_invalid_and_keeps_state() {
        let mut config = ConnectionConfig::default();
        assert!(config.set_base_url("https://api.example.com"));

        for bad in ["", "   ", "not a url", "/relative/path", "example.com"] {
            assert!(!config.set_base_url(bad), "accepted {bad:?}");
            assert_eq!(config.base_url, "https://api.example.com");
        }
    }

    #[test]
    fn test_set_token_strips_bearer() {
        let mut config = ConnectionConfig::default();
        assert!(config.set_token("Bearer abc.def"));
        assert_eq!(config.token, "abc.def");

        assert!(config.set_token("plain"));
        assert_eq!(config.token, "plain");
    }

    #[test]
    fn test_set_token_rejects_blank() {
        let mut config = ConnectionConfig::default();
        assert!(config.set_token("keep"));
        assert!(!config.set_token(""));
        assert!(!config.set_token(" \t\n"));
        assert_eq!(config.token, "keep");
    }

    #[test]
    fn test_token_format_selects_strategy() {
        let mut config = ConnectionConfig::default();
        assert_eq!(config.effective_strategy(), AuthStrategy::token_only());

        config.set_token_format(true, false);
        assert_eq!(config.effective_strategy(), AuthStrategy::bearer());

        config.set_token_format(true, true);
        assert_eq!(config.effective_strategy(), AuthStrategy::token_header());
    }

    #[test]
    fn test_adopted_strategy_wins_until_format_changes() {
        let mut config = ConnectionConfig::default();
        config.adopt_strategy(AuthStrategy::url_param("api_key"));
        assert_eq!(config.effective_strategy(), AuthStrategy::url_param("api_key"));

        config.set_token_format(false, false);
        assert_eq!(config.effective_strategy(), AuthStrategy::token_only());
    }

    #[test]
    fn test_status_endpoint_ignores_blank() {
        let mut config = ConnectionConfig::default();
        assert!(!config.set_status_endpoint("  "));
        assert_eq!(config.status_endpoint, DEFAULT_STATUS_ENDPOINT);
        assert!(config.set_status_endpoint(" health "));
        assert_eq!(config.status_endpoint, "health");
    }

    #[test]
    fn test_resolve() {
        let mut config = ConnectionConfig::default();
        config.set_base_url("https://api.example.com/");

        assert_eq!(config.resolve("products"), "https://api.example.com/products");
        assert_eq!(config.resolve("/products"), "https://api.example.com/products");
        assert_eq!(config.resolve(""), "https://api.example.com");
        assert_eq!(config.resolve("https://other.example.com/x"), "https://other.example.com/x");
    }

    #[test]
    fn test_is_complete() {
        let mut config = ConnectionConfig::default();
        assert!(!config.is_complete());
        config.set_base_url("https://api.example.com");
        assert!(!config.is_complete());
        config.set_token("t");
        assert!(config.is_complete());
    }
}
