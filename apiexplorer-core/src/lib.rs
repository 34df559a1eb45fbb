// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `ApiExplorer` Core
//!
//! Core types, models, and traits for the `ApiExplorer` application.
//!
//! This crate provides the foundational abstractions used across all other
//! `ApiExplorer` crates, including:
//!
//! - Domain models (connection config, auth strategies, resources)
//! - Resource shaping of arbitrary JSON responses
//! - CSV export of resource collections
//! - Collaborator traits (config persistence, message posting)
//!
//! ## Key Types
//!
//! ### Connection
//! - [`ConnectionConfig`] - Base URL, credential and auth selection
//! - [`TokenPrefix`] - Optional `Bearer ` prefix for the `Authorization` header
//! - [`AuthStrategy`] - How a credential is attached to a request
//!
//! ### Results
//! - [`ApiResult`] - Uniform success/failure shape returned by the client
//! - [`FailureKind`] - Distinguishable failure classes
//!
//! ### Resources
//! - [`ResourceDescriptor`] - A named unit of data derived from a response
//! - [`shape_resources`] - Derives descriptors from any JSON value
//! - [`SharePayload`] - Display fields extracted for sharing

pub mod error;
pub mod export;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Connection
    build_headers,
    AuthStrategy,
    ConnectionConfig,
    StrategyKind,
    TokenPrefix,
    DEFAULT_API_KEY_HEADER,
    DEFAULT_AUTH_HEADER,
    DEFAULT_RESOURCES,
    DEFAULT_STATUS_ENDPOINT,
    DEFAULT_TOKEN_HEADER,
    // Results
    ApiResult,
    FailureKind,
    // Resources
    shape_resources,
    ResourceDescriptor,
    SharePayload,
};

pub use export::export_csv;

// Re-export traits
pub use traits::{ConfigStore, MessagePoster};
