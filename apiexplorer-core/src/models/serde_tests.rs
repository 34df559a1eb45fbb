//! Serialization tests for the persisted and reported models.

use serde_json::json;

use super::{ApiResult, AuthStrategy, ConnectionConfig, FailureKind, TokenPrefix};

#[test]
fn test_config_uses_store_keys() {
    let mut config = ConnectionConfig::default();
    config.set_base_url("https://api.example.com/");
    config.set_token("Bearer secret");
    config.set_token_format(true, false);

    let value = serde_json::to_value(&config).unwrap();
    assert_eq!(value["apiUrl"], "https://api.example.com");
    assert_eq!(value["apiToken"], "secret");
    assert_eq!(value["tokenPrefix"], "Bearer ");
    assert_eq!(value["useTokenHeader"], false);
    assert_eq!(value["statusEndpoint"], "status");
    assert!(value.get("authStrategy").is_none());
}

#[test]
fn test_config_missing_keys_use_defaults() {
    let config: ConnectionConfig = serde_json::from_value(json!({
        "apiUrl": "https://api.example.com",
        "tokenPrefix": ""
    }))
    .unwrap();

    assert_eq!(config.base_url, "https://api.example.com");
    assert_eq!(config.token, "");
    assert_eq!(config.token_prefix, TokenPrefix::None);
    assert_eq!(config.status_endpoint, "status");
    assert_eq!(config.resources.len(), 3);
    assert!(!config.is_complete());
}

#[test]
fn test_config_roundtrip_with_adopted_strategy() {
    let mut config = ConnectionConfig::default();
    config.set_base_url("https://api.example.com");
    config.set_token("secret");
    config.adopt_strategy(AuthStrategy::url_param("api_key"));

    let json = serde_json::to_string(&config).unwrap();
    let parsed: ConnectionConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_strategy_tagging() {
    let value = serde_json::to_value(AuthStrategy::bearer()).unwrap();
    assert_eq!(value, json!({"type": "bearer", "header": "Authorization"}));

    let value = serde_json::to_value(AuthStrategy::None).unwrap();
    assert_eq!(value, json!({"type": "none"}));

    let parsed: AuthStrategy =
        serde_json::from_value(json!({"type": "url-param", "param": "token"})).unwrap();
    assert_eq!(parsed, AuthStrategy::url_param("token"));
}

#[test]
fn test_result_shape() {
    let value = serde_json::to_value(ApiResult::success(200, Some(json!([1])), "ok")).unwrap();
    assert_eq!(value, json!({"outcome": "success", "status": 200, "data": [1], "message": "ok"}));

    let value = serde_json::to_value(ApiResult::failure(
        FailureKind::Authentication,
        Some(401),
        "denied",
    ))
    .unwrap();
    assert_eq!(value["outcome"], "failure");
    assert_eq!(value["kind"], "authentication");
    assert_eq!(value["status"], 401);
}
