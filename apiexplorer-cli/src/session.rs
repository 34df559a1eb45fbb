//! Explicitly-owned session state shared by the command handlers.

use anyhow::{bail, Result};
use apiexplorer_core::{ApiResult, FailureKind};
use apiexplorer_fetch::{ApiClient, ClientSettings};
use apiexplorer_store::JsonConfigStore;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

// ============================================================================
// Api Failure
// ============================================================================

/// A classified API failure surfaced as a command error.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiFailure {
    /// Failure class, used to pick the exit code.
    pub kind: FailureKind,
    /// Message from the client.
    pub message: String,
}

impl ApiFailure {
    /// Creates a failure.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Turns a failed result into an error, passing successes through.
pub fn ensure_success(result: ApiResult) -> Result<ApiResult> {
    match result {
        ApiResult::Failure { kind, message, .. } => Err(ApiFailure::new(kind, message).into()),
        success @ ApiResult::Success { .. } => Ok(success),
    }
}

// ============================================================================
// Session
// ============================================================================

/// Client, config store and output options for one invocation.
pub struct Session {
    /// The API client.
    pub client: ApiClient,
    /// Where the connection config lives.
    pub store: JsonConfigStore,
    /// Output format.
    pub format: OutputFormat,
    pretty: bool,
    use_colors: bool,
}

impl Session {
    /// Builds the session and loads the stored config.
    pub async fn open(cli: &Cli) -> Result<Self> {
        let store = cli
            .config
            .as_ref()
            .map_or_else(JsonConfigStore::at_default_path, JsonConfigStore::new);
        let mut client = ApiClient::new(ClientSettings::default())?;

        let complete = client.load_config(&store).await;
        debug!(path = %store.path().display(), complete, "Session opened");

        Ok(Self {
            client,
            store,
            format: cli.format,
            pretty: cli.pretty,
            use_colors: !cli.no_color,
        })
    }

    /// Returns a text formatter honoring `--no-color`.
    pub fn text(&self) -> TextFormatter {
        TextFormatter::new(self.use_colors)
    }

    /// Returns a JSON formatter honoring `--pretty`.
    pub fn json(&self) -> JsonFormatter {
        JsonFormatter::new(self.pretty)
    }

    /// Persists the connection config.
    ///
    /// Returns whether the config is complete (base URL and token).
    pub async fn persist(&self) -> Result<bool> {
        if self.client.save_config(&self.store).await {
            return Ok(true);
        }
        if self.client.config().is_complete() {
            bail!("Failed to save config to {}", self.store.path().display());
        }
        Ok(false)
    }

    /// Fails early when no base URL or token is configured.
    pub fn require_config(&self) -> Result<()> {
        let config = self.client.config();
        if config.base_url.is_empty() {
            bail!("No API URL configured. Run `apiexplorer config set-url <URL>` first");
        }
        if config.token.is_empty() {
            bail!("No token configured. Run `apiexplorer config set-token <TOKEN>` first");
        }
        Ok(())
    }

    /// Connects and fetches `resource`, returning its data.
    pub async fn fetch(&mut self, resource: &str) -> Result<Value> {
        self.require_config()?;
        ensure_success(self.client.connect().await?)?;

        let result = ensure_success(self.client.get_resource_data(resource).await?)?;
        Ok(result.into_data().unwrap_or(Value::Null))
    }
}
