//! Collaborator traits for `ApiExplorer`.
//!
//! The API client never touches storage or the messaging surface directly.
//! Both are injected through the narrow traits defined here.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::ConnectionConfig;

/// Persistence for the connection configuration.
///
/// Implementations decide where the configuration lives (a JSON file, an
/// in-memory map in tests, ...). A missing configuration is not an error.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Loads the stored configuration, or `None` if nothing was saved yet.
    async fn load(&self) -> Result<Option<ConnectionConfig>, CoreError>;

    /// Persists the configuration, replacing whatever was stored.
    async fn save(&self, config: &ConnectionConfig) -> Result<(), CoreError>;
}

/// Pushes a composed message (and optionally an image) to a messaging surface.
///
/// Returns `true` if the message was delivered. Delivery problems are the
/// poster's concern and are never raised to the caller.
#[async_trait]
pub trait MessagePoster: Send + Sync {
    /// Posts `message` under `title`, attaching `image` when present.
    async fn post(&self, title: &str, message: &str, image: Option<&[u8]>) -> bool;
}
