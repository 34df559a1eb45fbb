//! CLI command implementations.

pub mod config;
pub mod connect;
pub mod export;
pub mod image_url;
pub mod probe;
pub mod resources;
pub mod share;
