//! Domain models for `ApiExplorer`.
//!
//! ## Submodules
//!
//! - [`auth`] - Auth strategies and header construction
//! - [`connection`] - Connection configuration and its setters
//! - [`result`] - Uniform result shape of client operations
//! - [`resource`] - Resource descriptors and response shaping
//! - [`share`] - Display fields extracted for the share action

mod auth;
mod connection;
mod resource;
mod result;
mod share;

// Re-export everything at the models level
pub use auth::{
    build_headers, AuthStrategy, StrategyKind, DEFAULT_API_KEY_HEADER, DEFAULT_AUTH_HEADER,
    DEFAULT_TOKEN_HEADER,
};
pub use connection::{ConnectionConfig, TokenPrefix, DEFAULT_RESOURCES, DEFAULT_STATUS_ENDPOINT};
pub use resource::{shape_resources, ResourceDescriptor};
pub use result::{ApiResult, FailureKind};
pub use share::SharePayload;
#[cfg(test)]
mod serde_tests;
