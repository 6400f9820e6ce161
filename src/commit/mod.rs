// src/commit/mod.rs

//! Commit generators.
//!
//! A generator owns one subsystem root of the configuration tree (for
//! example `policy prefix-list`). Given the candidate and running trees it
//! returns the native command batches that move the daemon from running to
//! candidate for that subsystem. Generators are pure: they never mutate
//! either tree; running catches up through the mutations that keep arriving
//! during the commit window.
//!
//! - [`lists`] covers the six list-shaped subsystems.
//! - [`route_map`] does an attribute-level diff per route-map rule.
//! - [`table`] registers generators with their commit guard.

pub mod lists;
pub mod route_map;
pub mod table;

use std::fmt;

use crate::exec::CommandBatch;
use crate::tree::ConfigTree;

pub use lists::ListGenerator;
pub use route_map::RouteMapGenerator;
pub use table::CommitTable;

/// Per-subsystem command emitter.
pub trait CommitGenerator: Send + Sync {
    /// Short name used in logs and push commands.
    fn name(&self) -> &'static str;

    /// Subsystem root path.
    fn root(&self) -> &'static [&'static str];

    /// Batches to run, in order.
    fn generate(&self, candidate: &ConfigTree, running: &ConfigTree) -> Vec<CommandBatch>;
}

impl fmt::Debug for dyn CommitGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitGenerator")
            .field("name", &self.name())
            .field("root", &self.root())
            .finish()
    }
}
