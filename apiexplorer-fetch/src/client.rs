//! The API client.
//!
//! Owns the connection config, the pacing gate and the response cache.
//! Every request goes through [`ApiClient::execute`], which paces, retries
//! transport errors and 429 responses, and reads the body. Callers classify
//! the returned exchange into an [`ApiResult`].

use apiexplorer_core::{ApiResult, AuthStrategy, ConfigStore, ConnectionConfig, FailureKind};
use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    Method, Response, StatusCode,
};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::cache::{CacheKey, ResponseCache};
use crate::error::FetchError;
use crate::http::{HttpClient, ResponseExt};
use crate::pacer::PacingGate;
use crate::retry::RetryStrategy;
use crate::settings::ClientSettings;

/// Path segment that marks a file-store URL.
const MY_FILES_SEGMENT: &str = "/MyFiles/";

/// File-store sub-path served without a token.
const PUBLIC_FILES_SEGMENT: &str = "/MyFiles/Public/";

/// Query parameter carrying a file access token.
const FILE_TOKEN_PARAM: &str = "myft";

/// Endpoint that exchanges a file path for an access token.
const FILE_TOKEN_ENDPOINT: &str = "get-myfiles-token";

// ============================================================================
// Exchange
// ============================================================================

/// A completed HTTP exchange: status, `Retry-After` and decoded body.
#[derive(Debug, Clone)]
pub(crate) struct Exchange {
    pub status: StatusCode,
    pub retry_after_secs: Option<u64>,
    pub body: Value,
}

// ============================================================================
// Api Client
// ============================================================================

/// Client for an arbitrary REST-like API.
#[derive(Debug)]
pub struct ApiClient {
    config: ConnectionConfig,
    settings: ClientSettings,
    http: HttpClient,
    retry: RetryStrategy,
    pacer: PacingGate,
    cache: ResponseCache,
    connected: bool,
}

impl ApiClient {
    /// Creates a client with an empty connection config.
    pub fn new(settings: ClientSettings) -> Result<Self, FetchError> {
        Self::with_config(settings, ConnectionConfig::default())
    }

    /// Creates a client for an existing connection config.
    pub fn with_config(
        settings: ClientSettings,
        config: ConnectionConfig,
    ) -> Result<Self, FetchError> {
        let http = HttpClient::new(&settings)?;
        Ok(Self {
            config,
            retry: settings.retry_strategy(),
            pacer: PacingGate::new(settings.min_request_interval),
            settings,
            http,
            cache: ResponseCache::new(),
            connected: false,
        })
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    /// Returns the connection config.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Returns the client settings.
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Sets the base URL. See [`ConnectionConfig::set_base_url`].
    pub fn set_base_url(&mut self, url: &str) -> bool {
        let accepted = self.config.set_base_url(url);
        if accepted {
            debug!(base_url = %self.config.base_url, "Base URL set");
        } else {
            warn!(url, "Rejected base URL");
        }
        accepted
    }

    /// Sets the token. See [`ConnectionConfig::set_token`].
    pub fn set_token(&mut self, token: &str) -> bool {
        let accepted = self.config.set_token(token);
        if !accepted {
            warn!("Rejected empty token");
        }
        accepted
    }

    /// Selects the token format for outgoing requests.
    pub fn set_token_format(&mut self, use_bearer: bool, use_token_header: bool) {
        self.config.set_token_format(use_bearer, use_token_header);
        debug!(use_bearer, use_token_header, "Token format set");
    }

    /// Sets the status endpoint. Empty input is ignored.
    pub fn set_status_endpoint(&mut self, endpoint: &str) -> bool {
        self.config.set_status_endpoint(endpoint)
    }

    /// Adopts an auth strategy for all later requests.
    pub fn adopt_strategy(&mut self, strategy: AuthStrategy) {
        info!(strategy = %strategy, "Adopting auth strategy");
        self.config.adopt_strategy(strategy);
    }

    /// Returns the known resource names.
    pub fn resources(&self) -> &[String] {
        &self.config.resources
    }

    /// Returns true after a successful [`connect`](Self::connect).
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Returns the response cache.
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Drops all cached responses.
    pub fn clear_cache(&mut self) {
        debug!(entries = self.cache.len(), "Clearing response cache");
        self.cache.clear();
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    /// Writes the connection config to `store`.
    ///
    /// Returns true if the config was written and holds both a base URL and
    /// a token.
    #[instrument(skip(self, store))]
    pub async fn save_config(&self, store: &dyn ConfigStore) -> bool {
        match store.save(&self.config).await {
            Ok(()) => {
                debug!("Config saved");
                self.config.is_complete()
            }
            Err(e) => {
                warn!(error = %e, "Failed to save config");
                false
            }
        }
    }

    /// Replaces the connection config with the one in `store`.
    ///
    /// Returns true if a config was found and holds both a base URL and a
    /// token. The connection flag and the cache are reset on load.
    #[instrument(skip(self, store))]
    pub async fn load_config(&mut self, store: &dyn ConfigStore) -> bool {
        match store.load().await {
            Ok(Some(config)) => {
                self.config = config;
                self.connected = false;
                self.cache.clear();
                debug!(complete = self.config.is_complete(), "Config loaded");
                self.config.is_complete()
            }
            Ok(None) => {
                debug!("No stored config");
                false
            }
            Err(e) => {
                warn!(error = %e, "Failed to load config");
                false
            }
        }
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Issues a GET to the base URL and updates the connection flag.
    ///
    /// On success the parsed root response is returned as data. Any other
    /// outcome, including an error, clears the connection flag.
    #[instrument(skip(self))]
    pub async fn connect(&mut self) -> Result<ApiResult, FetchError> {
        let result = match self.request_root().await {
            Ok(result) => result,
            Err(e) => {
                self.connected = false;
                e.into_result()?
            }
        };

        self.connected = result.is_success();
        if self.connected {
            info!(base_url = %self.config.base_url, "Connected");
        } else {
            warn!(message = result.message(), "Connection failed");
        }
        Ok(result)
    }

    async fn request_root(&mut self) -> Result<ApiResult, FetchError> {
        let base = self.base_url()?;
        let exchange = self.get(&base).await?;
        Ok(classify(exchange, format!("Connected to {base}")))
    }

    /// Probes an arbitrary endpoint or absolute URL.
    ///
    /// Results are cached per resolved URL, except rate-limited ones and
    /// configuration failures, which never reach the network.
    #[instrument(skip(self))]
    pub async fn try_connect(&mut self, endpoint: &str) -> Result<ApiResult, FetchError> {
        let url = match self.resolve(endpoint) {
            Ok(url) => url,
            Err(e) => return e.into_result(),
        };
        let key = CacheKey::connect(url.clone());
        if let Some(cached) = self.cache.get(&key) {
            debug!(url = %url, "Cache hit");
            return Ok(cached.clone());
        }

        let exchange = match self.get(&url).await {
            Ok(exchange) => exchange,
            Err(e) => return e.into_result(),
        };
        let result = classify(exchange, format!("Connected to {endpoint}"));
        self.cache.insert(key, result.clone());
        Ok(result)
    }

    /// Fetches a resource by name or path.
    ///
    /// Needs a prior successful [`connect`](Self::connect). A 401 response
    /// means the connection was lost and clears the connection flag. Only
    /// successful results are cached.
    #[instrument(skip(self))]
    pub async fn get_resource_data(&mut self, resource: &str) -> Result<ApiResult, FetchError> {
        if !self.connected {
            return Ok(ApiResult::not_connected());
        }

        let url = match self.resolve(resource) {
            Ok(url) => url,
            Err(e) => return e.into_result(),
        };
        let key = CacheKey::data(url.clone());
        if let Some(cached) = self.cache.get(&key) {
            debug!(url = %url, "Cache hit");
            return Ok(cached.clone());
        }
        debug!(url = %url, "Cache miss");

        let exchange = match self.get(&url).await {
            Ok(exchange) => exchange,
            Err(e) => return e.into_result(),
        };
        if exchange.status == StatusCode::UNAUTHORIZED {
            warn!(resource, "Connection lost");
            self.connected = false;
        }

        let result = classify(exchange, format!("Loaded {resource}"));
        if result.is_success() {
            self.cache.insert(key, result.clone());
        }
        Ok(result)
    }

    /// Returns a URL the image can be loaded from.
    ///
    /// URLs that already carry a file token, point at the public file area
    /// or are not file-store URLs are returned unchanged. Otherwise a token
    /// is requested and appended. Any failure yields the input unchanged.
    #[instrument(skip(self))]
    pub async fn get_image_url(&mut self, image_url: &str) -> String {
        if has_file_token(image_url) || image_url.contains(PUBLIC_FILES_SEGMENT) {
            return image_url.to_string();
        }
        let Some((_, path)) = image_url.split_once(MY_FILES_SEGMENT) else {
            return image_url.to_string();
        };
        if path.is_empty() {
            return image_url.to_string();
        }

        match self.request_file_token(path).await {
            Ok(Some(token)) => append_file_token(image_url, &token),
            Ok(None) => image_url.to_string(),
            Err(e) => {
                warn!(error = %e, "File token request failed");
                image_url.to_string()
            }
        }
    }

    async fn request_file_token(&mut self, path: &str) -> Result<Option<String>, FetchError> {
        let base = self.base_url()?;
        let mut url = Url::parse(&format!("{base}/{FILE_TOKEN_ENDPOINT}"))
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("path", &format!("MyFiles/{path}"));

        let strategy = self.config.effective_strategy();
        let url = with_query_credential(url, &strategy, &self.config.token);
        let headers = request_headers(&strategy, &self.config.token)?;
        let retry = self.retry.clone();
        let exchange = self.execute(Method::POST, url, headers, &retry).await?;

        if !exchange.status.is_success() {
            debug!(status = %exchange.status, "File token refused");
            return Ok(None);
        }
        Ok(exchange
            .body
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string))
    }

    // ------------------------------------------------------------------------
    // Request plumbing
    // ------------------------------------------------------------------------

    fn base_url(&self) -> Result<String, FetchError> {
        if self.config.base_url.is_empty() {
            return Err(FetchError::InvalidUrl("base URL is not configured".to_string()));
        }
        Ok(self.config.base_url.clone())
    }

    fn resolve(&self, endpoint: &str) -> Result<String, FetchError> {
        let absolute = endpoint.starts_with("http://") || endpoint.starts_with("https://");
        if !absolute {
            self.base_url()?;
        }
        Ok(self.config.resolve(endpoint))
    }

    /// GET with the configured strategy and retry budget.
    async fn get(&mut self, url: &str) -> Result<Exchange, FetchError> {
        let strategy = self.config.effective_strategy();
        let retry = self.retry.clone();
        self.get_with_strategy(url, &strategy, &retry).await
    }

    pub(crate) async fn get_with_strategy(
        &mut self,
        url: &str,
        strategy: &AuthStrategy,
        retry: &RetryStrategy,
    ) -> Result<Exchange, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
        let parsed = with_query_credential(parsed, strategy, &self.config.token);
        let headers = request_headers(strategy, &self.config.token)?;
        self.execute(Method::GET, parsed, headers, retry).await
    }

    /// Sends a request through the pacing gate with retries.
    ///
    /// Transport errors and 429 responses are retried while the budget
    /// lasts. A 429 on the last attempt is returned as an exchange; a
    /// transport error on the last attempt is returned as an error.
    pub(crate) async fn execute(
        &mut self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        retry: &RetryStrategy,
    ) -> Result<Exchange, FetchError> {
        let mut attempt = 0;
        loop {
            self.pacer.wait().await;
            let outcome = self.http.send(method.clone(), &url, headers.clone()).await;

            match outcome {
                Ok(response) => {
                    let status = response.status();
                    let retry_after_secs = response.retry_after_secs();
                    let rate_limited = response.is_rate_limited();
                    let body = read_body(response).await;
                    self.pacer.mark_finished();

                    if rate_limited && retry.has_attempts_left(attempt) {
                        let delay = retry.rate_limit_delay(attempt, retry_after_secs);
                        warn!(
                            attempt = attempt + 1,
                            delay_ms = delay.as_millis(),
                            "Rate limited, retrying"
                        );
                        sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    return Ok(Exchange {
                        status,
                        retry_after_secs,
                        body,
                    });
                }
                Err(e) => {
                    self.pacer.mark_finished();
                    let retryable = match &e {
                        FetchError::Http(inner) => retry.should_retry(inner),
                        _ => false,
                    };
                    if retryable && retry.has_attempts_left(attempt) {
                        let delay = retry.delay_for_attempt(attempt);
                        warn!(
                            attempt = attempt + 1,
                            delay_ms = delay.as_millis(),
                            error = %e,
                            "Request failed, retrying"
                        );
                        sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(e);
                }
            }
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Builds the headers for a request: JSON content negotiation plus the
/// strategy's credential headers, marked sensitive.
fn request_headers(strategy: &AuthStrategy, token: &str) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    for (name, value) in strategy.to_headers(token) {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| FetchError::InvalidHeader(name.clone()))?;
        let mut header_value = HeaderValue::from_str(&value)
            .map_err(|_| FetchError::InvalidHeader(format!("value of {name}")))?;
        header_value.set_sensitive(true);
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

/// Appends the token as a query parameter for URL-parameter strategies.
fn with_query_credential(mut url: Url, strategy: &AuthStrategy, token: &str) -> Url {
    if let Some(param) = strategy.query_param() {
        url.query_pairs_mut().append_pair(param, token);
    }
    url
}

/// Reads a body as JSON, falling back to text. An empty body is `null`.
async fn read_body(response: Response) -> Value {
    match response.text().await {
        Ok(text) => parse_body(&text),
        Err(e) => {
            debug!(error = %e, "Failed to read response body");
            Value::Null
        }
    }
}

pub(crate) fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Extracts a `message` field from a JSON error body.
fn embedded_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Classifies an exchange into the uniform result shape.
pub(crate) fn classify(exchange: Exchange, success_message: String) -> ApiResult {
    let status = exchange.status;
    let code = status.as_u16();
    if status.is_success() {
        return ApiResult::success(code, Some(exchange.body), success_message);
    }

    let detail = embedded_message(&exchange.body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown status").to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiResult::failure(
            FailureKind::Authentication,
            Some(code),
            format!("Authentication failed ({code}): {detail}"),
        ),
        StatusCode::TOO_MANY_REQUESTS => ApiResult::failure(
            FailureKind::RateLimited {
                retry_after_secs: exchange.retry_after_secs,
            },
            Some(code),
            format!("Too many requests ({code}): {detail}"),
        ),
        _ => ApiResult::failure(FailureKind::Http, Some(code), format!("HTTP {code}: {detail}")),
    }
}

fn has_file_token(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed.query_pairs().any(|(k, _)| k == FILE_TOKEN_PARAM),
        Err(_) => url.contains(&format!("{FILE_TOKEN_PARAM}=")),
    }
}

fn append_file_token(image_url: &str, token: &str) -> String {
    match Url::parse(image_url) {
        Ok(mut parsed) => {
            parsed.query_pairs_mut().append_pair(FILE_TOKEN_PARAM, token);
            parsed.to_string()
        }
        Err(_) => {
            let separator = if image_url.contains('?') { '&' } else { '?' };
            format!("{image_url}{separator}{FILE_TOKEN_PARAM}={token}")
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn exchange(status: u16, body: Value) -> Exchange {
        Exchange {
            status: StatusCode::from_u16(status).unwrap(),
            retry_after_secs: None,
            body,
        }
    }

    #[test]
    fn test_parse_body_falls_back_to_text() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("  \n"), Value::Null);
        assert_eq!(parse_body(r#"{"a":1}"#), json!({"a": 1}));
        assert_eq!(parse_body("<html>oops</html>"), json!("<html>oops</html>"));
    }

    #[test]
    fn test_classify_uses_embedded_message() {
        let result = classify(exchange(401, json!({"message": "token expired"})), String::new());
        assert!(result.is_auth_failure());
        assert!(result.message().contains("token expired"));

        let result = classify(exchange(403, json!("not json")), String::new());
        assert_eq!(result.failure_kind(), Some(FailureKind::Authentication));
        assert!(result.message().contains("Forbidden"));
    }

    #[test]
    fn test_classify_other_statuses() {
        let result = classify(exchange(500, Value::Null), String::new());
        assert_eq!(result.failure_kind(), Some(FailureKind::Http));
        assert_eq!(result.status(), Some(500));

        let mut limited = exchange(429, Value::Null);
        limited.retry_after_secs = Some(30);
        let result = classify(limited, String::new());
        assert_eq!(
            result.failure_kind(),
            Some(FailureKind::RateLimited {
                retry_after_secs: Some(30)
            })
        );

        let result = classify(exchange(204, Value::Null), "ok".to_string());
        assert!(result.is_success());
        assert_eq!(result.message(), "ok");
    }

    #[test]
    fn test_request_headers_mark_credentials() {
        let headers = request_headers(&AuthStrategy::bearer(), "abc").unwrap();
        assert_eq!(headers["accept"], "application/json");
        assert_eq!(headers["authorization"], "Bearer abc");
        assert!(headers["authorization"].is_sensitive());
    }

    #[test]
    fn test_request_headers_reject_bad_names() {
        let err = request_headers(&AuthStrategy::CustomHeader, "Bad Name:value").unwrap_err();
        assert!(matches!(err, FetchError::InvalidHeader(_)));
    }

    #[test]
    fn test_query_credential() {
        let url = Url::parse("https://api.example.com/items?page=2").unwrap();
        let url = with_query_credential(url, &AuthStrategy::url_param("api_key"), "s3cret");
        assert_eq!(url.as_str(), "https://api.example.com/items?page=2&api_key=s3cret");

        let url = Url::parse("https://api.example.com/items").unwrap();
        let url = with_query_credential(url, &AuthStrategy::bearer(), "s3cret");
        assert_eq!(url.as_str(), "https://api.example.com/items");
    }

    #[test]
    fn test_file_token_detection() {
        assert!(has_file_token("https://files.example.com/MyFiles/a.png?myft=abc"));
        assert!(!has_file_token("https://files.example.com/MyFiles/a.png"));
        assert_eq!(
            append_file_token("https://files.example.com/MyFiles/a.png", "t1"),
            "https://files.example.com/MyFiles/a.png?myft=t1"
        );
    }

    #[test]
    fn test_not_connected_before_connect() {
        let client = ApiClient::new(ClientSettings::default()).unwrap();
        assert!(!client.is_connected());
        assert_eq!(client.resources().len(), 3);
    }
}
