// src/exec/backend.rs

//! Pluggable command executor abstraction.
//!
//! The runtime talks to a `CommandExecutor` instead of spawning processes
//! itself. This makes it easy to swap in a recording executor in tests while
//! keeping the production implementation in [`super::vtysh`].

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::exec::CommandBatch;

/// Trait abstracting how command batches reach the routing daemon.
///
/// Production code uses [`super::VtyshExecutor`]; `--dry-run` uses
/// [`super::DryRunExecutor`]; tests provide their own implementation.
pub trait CommandExecutor: Send {
    /// Run one batch to completion and return its captured output.
    ///
    /// A batch is all-or-nothing from the caller's point of view: an error
    /// means the daemon may have applied none, some or all of its lines.
    fn execute(
        &mut self,
        batch: CommandBatch,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>>;
}
