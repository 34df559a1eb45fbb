//! Auth strategies.
//!
//! An [`AuthStrategy`] decides how the credential is attached to an outgoing
//! request: as the value of some header, or as a query parameter.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Header used by the `Authorization`-style strategies.
pub const DEFAULT_AUTH_HEADER: &str = "Authorization";

/// Header used by the API key strategy.
pub const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";

/// Header used by the custom `token` header strategy.
pub const DEFAULT_TOKEN_HEADER: &str = "token";

// ============================================================================
// Strategy Kind
// ============================================================================

/// The name of an auth strategy, without its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Bare token as the header value.
    TokenOnly,
    /// `Bearer <token>`.
    Bearer,
    /// `Basic <base64(token)>`.
    Basic,
    /// Token in an API key header.
    ApiKey,
    /// Token in a dedicated `token` header.
    TokenHeader,
    /// `Token <token>`.
    TokenScheme,
    /// Token is `Name:Value`, sent as that header.
    CustomHeader,
    /// Token as a query parameter.
    UrlParam,
    /// No credential.
    None,
}

impl StrategyKind {
    /// Returns the canonical name used in config files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TokenOnly => "token-only",
            Self::Bearer => "bearer",
            Self::Basic => "basic",
            Self::ApiKey => "api-key",
            Self::TokenHeader => "token-header",
            Self::TokenScheme => "token-scheme",
            Self::CustomHeader => "custom-header",
            Self::UrlParam => "url-param",
            Self::None => "none",
        }
    }

    /// Returns all strategy kinds.
    pub fn all() -> &'static [StrategyKind] {
        &[
            Self::TokenOnly,
            Self::Bearer,
            Self::Basic,
            Self::ApiKey,
            Self::TokenHeader,
            Self::TokenScheme,
            Self::CustomHeader,
            Self::UrlParam,
            Self::None,
        ]
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "custom" => return Ok(Self::CustomHeader),
            "token" => return Ok(Self::TokenScheme),
            _ => {}
        }
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| CoreError::UnknownStrategy(s.to_string()))
    }
}

// ============================================================================
// Auth Strategy
// ============================================================================

/// How a credential is attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AuthStrategy {
    /// `<header>: <token>`.
    TokenOnly {
        /// Header name.
        header: String,
    },
    /// `<header>: Bearer <token>`.
    Bearer {
        /// Header name.
        header: String,
    },
    /// `<header>: Basic <base64(token)>`.
    Basic {
        /// Header name.
        header: String,
    },
    /// `<header>: <token>`, conventionally `X-API-Key`.
    ApiKey {
        /// Header name.
        header: String,
    },
    /// `<header>: <token>`, conventionally a custom `token` header.
    TokenHeader {
        /// Header name.
        header: String,
    },
    /// `<header>: Token <token>`.
    TokenScheme {
        /// Header name.
        header: String,
    },
    /// The token itself is `HeaderName:HeaderValue`.
    CustomHeader,
    /// `?<param>=<token>` appended to the request URL.
    UrlParam {
        /// Query parameter name.
        param: String,
    },
    /// No credential attached.
    None,
}

impl AuthStrategy {
    /// Builds a strategy of `kind`.
    ///
    /// `name` is the header name for the `Authorization`-style strategies and
    /// the query parameter for [`StrategyKind::UrlParam`]. The API key and
    /// token header strategies always use their conventional header.
    pub fn from_kind(kind: StrategyKind, name: &str) -> Self {
        let name = name.to_string();
        match kind {
            StrategyKind::TokenOnly => Self::TokenOnly { header: name },
            StrategyKind::Bearer => Self::Bearer { header: name },
            StrategyKind::Basic => Self::Basic { header: name },
            StrategyKind::TokenScheme => Self::TokenScheme { header: name },
            StrategyKind::ApiKey => Self::api_key(),
            StrategyKind::TokenHeader => Self::token_header(),
            StrategyKind::CustomHeader => Self::CustomHeader,
            StrategyKind::UrlParam => Self::UrlParam { param: name },
            StrategyKind::None => Self::None,
        }
    }

    /// Bare token in `Authorization`.
    pub fn token_only() -> Self {
        Self::TokenOnly {
            header: DEFAULT_AUTH_HEADER.to_string(),
        }
    }

    /// `Authorization: Bearer <token>`.
    pub fn bearer() -> Self {
        Self::Bearer {
            header: DEFAULT_AUTH_HEADER.to_string(),
        }
    }

    /// `X-API-Key: <token>`.
    pub fn api_key() -> Self {
        Self::ApiKey {
            header: DEFAULT_API_KEY_HEADER.to_string(),
        }
    }

    /// `token: <token>`.
    pub fn token_header() -> Self {
        Self::TokenHeader {
            header: DEFAULT_TOKEN_HEADER.to_string(),
        }
    }

    /// Token as the `param` query parameter.
    pub fn url_param(param: impl Into<String>) -> Self {
        Self::UrlParam {
            param: param.into(),
        }
    }

    /// Returns the kind of this strategy.
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::TokenOnly { .. } => StrategyKind::TokenOnly,
            Self::Bearer { .. } => StrategyKind::Bearer,
            Self::Basic { .. } => StrategyKind::Basic,
            Self::ApiKey { .. } => StrategyKind::ApiKey,
            Self::TokenHeader { .. } => StrategyKind::TokenHeader,
            Self::TokenScheme { .. } => StrategyKind::TokenScheme,
            Self::CustomHeader => StrategyKind::CustomHeader,
            Self::UrlParam { .. } => StrategyKind::UrlParam,
            Self::None => StrategyKind::None,
        }
    }

    /// Returns the auth headers this strategy attaches for `token`.
    ///
    /// Only the credential headers are returned; content negotiation headers
    /// are the client's business. Query parameter and `None` strategies
    /// produce an empty map, as does a custom header token without a
    /// non-empty name and value.
    pub fn to_headers(&self, token: &str) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        match self {
            Self::TokenOnly { header } | Self::ApiKey { header } | Self::TokenHeader { header } => {
                headers.insert(header.clone(), token.to_string());
            }
            Self::Bearer { header } => {
                headers.insert(header.clone(), format!("Bearer {token}"));
            }
            Self::Basic { header } => {
                headers.insert(header.clone(), format!("Basic {}", STANDARD.encode(token)));
            }
            Self::TokenScheme { header } => {
                headers.insert(header.clone(), format!("Token {token}"));
            }
            Self::CustomHeader => {
                if let Some((name, value)) = token.split_once(':') {
                    let (name, value) = (name.trim(), value.trim());
                    if !name.is_empty() && !value.is_empty() {
                        headers.insert(name.to_string(), value.to_string());
                    }
                }
            }
            Self::UrlParam { .. } | Self::None => {}
        }
        headers
    }

    /// Returns the query parameter name if this strategy sends the token in the URL.
    pub fn query_param(&self) -> Option<&str> {
        match self {
            Self::UrlParam { param } => Some(param),
            _ => None,
        }
    }

    /// Human-readable description, e.g. `bearer (Authorization)`.
    pub fn label(&self) -> String {
        match self {
            Self::TokenOnly { header }
            | Self::Bearer { header }
            | Self::Basic { header }
            | Self::ApiKey { header }
            | Self::TokenHeader { header }
            | Self::TokenScheme { header } => format!("{} ({header})", self.kind()),
            Self::UrlParam { param } => format!("{} ({param})", self.kind()),
            Self::CustomHeader | Self::None => self.kind().to_string(),
        }
    }
}

impl Default for AuthStrategy {
    fn default() -> Self {
        Self::token_only()
    }
}

impl fmt::Display for AuthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Builds the auth headers for `kind` with `token`.
///
/// `header_name` is used by the strategies that take a header name; see
/// [`AuthStrategy::from_kind`].
pub fn build_headers(kind: StrategyKind, token: &str, header_name: &str) -> BTreeMap<String, String> {
    AuthStrategy::from_kind(kind, header_name).to_headers(token)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_encodes_token() {
        let headers = build_headers(StrategyKind::Basic, "user:pass", "Authorization");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers["Authorization"], "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_custom_header_splits_on_first_colon() {
        let headers = build_headers(StrategyKind::CustomHeader, "X-Foo:bar", "Authorization");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers["X-Foo"], "bar");

        let headers = AuthStrategy::CustomHeader.to_headers("X-Sig: a:b:c");
        assert_eq!(headers["X-Sig"], "a:b:c");
    }

    #[test]
    fn test_custom_header_without_colon_is_empty() {
        assert!(AuthStrategy::CustomHeader.to_headers("no-colon").is_empty());
        assert!(AuthStrategy::CustomHeader.to_headers(":value").is_empty());
        assert!(AuthStrategy::CustomHeader.to_headers("Name:").is_empty());
    }

    #[test]
    fn test_header_strategies() {
        let token = "abc123";

        let headers = build_headers(StrategyKind::TokenOnly, token, "Authorization");
        assert_eq!(headers["Authorization"], "abc123");

        let headers = build_headers(StrategyKind::Bearer, token, "Authorization");
        assert_eq!(headers["Authorization"], "Bearer abc123");

        let headers = build_headers(StrategyKind::TokenScheme, token, "Authorization");
        assert_eq!(headers["Authorization"], "Token abc123");

        // API key and token header ignore the supplied header name
        let headers = build_headers(StrategyKind::ApiKey, token, "Authorization");
        assert_eq!(headers["X-API-Key"], "abc123");
        assert_eq!(headers.len(), 1);

        let headers = build_headers(StrategyKind::TokenHeader, token, "Authorization");
        assert_eq!(headers["token"], "abc123");
    }

    #[test]
    fn test_none_and_url_param_have_no_headers() {
        assert!(build_headers(StrategyKind::None, "abc", "Authorization").is_empty());
        assert!(build_headers(StrategyKind::UrlParam, "abc", "token").is_empty());
        assert_eq!(AuthStrategy::url_param("api_key").query_param(), Some("api_key"));
        assert_eq!(AuthStrategy::bearer().query_param(), None);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("bearer".parse::<StrategyKind>().unwrap(), StrategyKind::Bearer);
        assert_eq!("Bearer".parse::<StrategyKind>().unwrap(), StrategyKind::Bearer);
        assert_eq!("custom".parse::<StrategyKind>().unwrap(), StrategyKind::CustomHeader);
        assert_eq!("url-param".parse::<StrategyKind>().unwrap(), StrategyKind::UrlParam);
        assert!("kerberos".parse::<StrategyKind>().is_err());

        for kind in StrategyKind::all() {
            assert_eq!(kind.as_str().parse::<StrategyKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_label() {
        assert_eq!(AuthStrategy::bearer().label(), "bearer (Authorization)");
        assert_eq!(AuthStrategy::url_param("token").label(), "url-param (token)");
        assert_eq!(AuthStrategy::None.label(), "none");
    }
}
