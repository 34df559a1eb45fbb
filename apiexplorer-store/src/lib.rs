// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # ApiExplorer Store
//!
//! Config persistence for ApiExplorer.
//!
//! - **JsonConfigStore**: [`apiexplorer_core::ConfigStore`] backed by a JSON file
//! - **Persistence**: atomic, owner-only JSON file I/O
//!
//! ## Usage
//!
//! ```ignore
//! use apiexplorer_store::JsonConfigStore;
//!
//! let store = JsonConfigStore::at_default_path();
//! if client.load_config(&store).await {
//!     client.connect().await?;
//! }
//! ```

pub mod config_store;
pub mod error;
pub mod persistence;

pub use config_store::JsonConfigStore;
pub use error::StoreError;
pub use persistence::{
    default_config_dir, default_config_path, ensure_dir, load_json, remove_file, save_json,
    CONFIG_FILE_NAME,
};
