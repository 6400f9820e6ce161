// src/config/mod.rs

//! Agent configuration.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate basic invariants (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_from_str, load_or_default};
pub use model::{CommitConfig, ConfigFile, ExecutorConfig, ManagementConfig, RawConfigFile};
