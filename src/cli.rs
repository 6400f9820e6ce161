// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `confsync`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "confsync",
    version,
    about = "Keep a routing daemon in sync with a transactional configuration store.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Built-in defaults are used when omitted.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CONFSYNC_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print command batches instead of sending them to the daemon.
    #[arg(long)]
    pub dry_run: bool,

    /// Run an event script offline instead of connecting to the store.
    #[arg(long, value_name = "PATH")]
    pub replay: Option<PathBuf>,

    /// Load and validate the config, print it, then exit.
    #[arg(long)]
    pub check_config: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
