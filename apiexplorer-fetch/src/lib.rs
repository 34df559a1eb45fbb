// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # ApiExplorer Fetch
//!
//! The API client: authenticated requests against an arbitrary REST-like
//! backend, with request pacing, retry/backoff and a session cache.
//!
//! - [`client::ApiClient`] - Connection state and client operations
//! - [`probe`] - Auth-strategy probe that adopts the first working strategy
//! - [`pacer::PacingGate`] - Minimum interval between requests
//! - [`retry::RetryStrategy`] - Backoff for transport errors and HTTP 429
//! - [`cache::ResponseCache`] - Per-session result cache
//!
//! ## Example
//!
//! ```ignore
//! use apiexplorer_fetch::{ApiClient, ClientSettings};
//!
//! let mut client = ApiClient::new(ClientSettings::default())?;
//! client.set_base_url("https://api.example.com");
//! client.set_token("Bearer abc123");
//!
//! if client.connect().await?.is_success() {
//!     let products = client.get_resource_data("products").await?;
//! }
//! ```

pub mod cache;
pub mod client;
pub mod error;
pub mod http;
pub mod pacer;
pub mod probe;
pub mod retry;
pub mod settings;

pub use cache::{CacheEntry, CacheKey, RequestKind, ResponseCache};
pub use client::ApiClient;
pub use error::FetchError;
pub use http::{HttpClient, ResponseExt};
pub use pacer::PacingGate;
pub use probe::{default_candidates, ProbeAttempt, ProbeCandidate, ProbeReport};
pub use retry::RetryStrategy;
pub use settings::ClientSettings;
