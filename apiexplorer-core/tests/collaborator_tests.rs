//! Integration tests for the collaborator traits and the share flow.

use std::sync::Mutex;

use apiexplorer_core::{
    shape_resources, ConfigStore, ConnectionConfig, CoreError, MessagePoster, SharePayload,
};
use async_trait::async_trait;
use serde_json::json;

/// Config store backed by memory.
#[derive(Default)]
struct MemoryStore {
    saved: Mutex<Option<ConnectionConfig>>,
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn load(&self) -> Result<Option<ConnectionConfig>, CoreError> {
        Ok(self.saved.lock().unwrap().clone())
    }

    async fn save(&self, config: &ConnectionConfig) -> Result<(), CoreError> {
        *self.saved.lock().unwrap() = Some(config.clone());
        Ok(())
    }
}

/// Poster that records what it was asked to send.
#[derive(Default)]
struct RecordingPoster {
    posts: Mutex<Vec<(String, String, bool)>>,
}

#[async_trait]
impl MessagePoster for RecordingPoster {
    async fn post(&self, title: &str, message: &str, image: Option<&[u8]>) -> bool {
        self.posts
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string(), image.is_some()));
        true
    }
}

#[tokio::test]
async fn test_store_roundtrip_through_trait_object() {
    let store: Box<dyn ConfigStore> = Box::new(MemoryStore::default());
    assert!(store.load().await.unwrap().is_none());

    let mut config = ConnectionConfig::default();
    assert!(config.set_base_url("https://shop.example.com/api/"));
    assert!(config.set_token("Bearer t0k3n"));
    store.save(&config).await.unwrap();

    let loaded = store.load().await.unwrap().unwrap();
    assert_eq!(loaded.base_url, "https://shop.example.com/api");
    assert_eq!(loaded.token, "t0k3n");
}

#[tokio::test]
async fn test_share_first_product() {
    let response = json!({
        "resources": [
            {"nombre": "Desk Lamp", "referencia": "LMP-01", "precio": "19.50"},
            {"nombre": "Chair"}
        ]
    });

    let resources = shape_resources(&response);
    let payload = SharePayload::from_descriptor(&resources[0]);
    let poster = RecordingPoster::default();

    assert!(poster.post(&payload.title, &payload.compose_message(), None).await);

    let posts = poster.posts.lock().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].0, "Desk Lamp");
    assert!(posts[0].1.starts_with("*Desk Lamp*\n\n📋 Reference: LMP-01\n💰 Price: 19.50\n"));
    assert!(!posts[0].2);
}
