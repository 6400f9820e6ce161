// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Wire decoding error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Event script error at line {line}: {message}")]
    ScriptError { line: usize, message: String },

    #[error("Command execution failed: {0}")]
    ExecutorError(String),

    #[error("Multiple values configured at '{0}'")]
    Cardinality(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SyncError>;
