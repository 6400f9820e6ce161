// src/exec/mod.rs

//! Command execution layer.
//!
//! This module is responsible for actually delivering the native commands
//! produced by commit generators to the routing daemon.
//!
//! - [`batch`] defines `CommandBatch`, the unit of execution.
//! - [`backend`] provides the `CommandExecutor` trait the runtime uses, and
//!   which tests can replace with a fake implementation.
//! - [`vtysh`] runs batches through the daemon's shell with
//!   `tokio::process::Command`.
//! - [`dry_run`] only prints them.

pub mod backend;
pub mod batch;
pub mod dry_run;
pub mod vtysh;

pub use backend::CommandExecutor;
pub use batch::{CONFIGURE_TERMINAL, CommandBatch};
pub use dry_run::DryRunExecutor;
pub use vtysh::VtyshExecutor;
