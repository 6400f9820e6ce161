// src/commit/table.rs

use tracing::{debug, info};

use crate::commit::lists::ListGenerator;
use crate::commit::route_map::RouteMapGenerator;
use crate::commit::CommitGenerator;
use crate::exec::CommandBatch;
use crate::tree::{ConfigTree, join_path, paths_overlap};

/// One registered subsystem: its generator plus the guard that keeps it from
/// running twice in the same commit window.
#[derive(Debug)]
struct CommitEntry {
    generator: Box<dyn CommitGenerator>,
    committed: bool,
}

impl CommitEntry {
    fn name(&self) -> &'static str {
        self.generator.name()
    }

    fn root(&self) -> &'static [&'static str] {
        self.generator.root()
    }

    /// Run the generator at most once per commit window.
    ///
    /// Returns the batches to push, or `None` when the guard was already set
    /// or the subsystem has no changes. The guard is only set once the
    /// generator has run.
    fn check(
        &mut self,
        candidate: &ConfigTree,
        running: &ConfigTree,
    ) -> Option<Vec<CommandBatch>> {
        if self.committed {
            return None;
        }

        if !candidate.differs_at(running, self.root()) {
            debug!(subsystem = self.name(), "no changes");
            return None;
        }

        let batches = self.generator.generate(candidate, running);
        self.committed = true;
        info!(
            subsystem = self.name(),
            batches = batches.len(),
            "generated commit batches"
        );
        Some(batches)
    }
}

/// Ordered registry of commit generators.
#[derive(Debug, Default)]
pub struct CommitTable {
    entries: Vec<CommitEntry>,
}

impl CommitTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every policy subsystem, lists before the route-maps that reference
    /// them.
    pub fn policy() -> Self {
        let mut table = Self::new();
        table.register(ListGenerator::access_list());
        table.register(ListGenerator::access_list6());
        table.register(ListGenerator::as_path_list());
        table.register(ListGenerator::community_list());
        table.register(ListGenerator::prefix_list());
        table.register(ListGenerator::prefix_list6());
        table.register(RouteMapGenerator::new());
        table
    }

    pub fn register<G: CommitGenerator + 'static>(&mut self, generator: G) {
        self.entries.push(CommitEntry {
            generator: Box::new(generator),
            committed: false,
        });
    }

    /// Names of subsystems whose guard is set.
    pub fn guards(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|e| e.committed)
            .map(|e| e.name())
            .collect()
    }

    pub fn reset_guards(&mut self) {
        for entry in &mut self.entries {
            entry.committed = false;
        }
    }

    /// Lazy check for a mutation at `path`: every subsystem whose root
    /// overlaps the path is considered.
    pub fn touch<S: AsRef<str>>(
        &mut self,
        path: &[S],
        candidate: &ConfigTree,
        running: &ConfigTree,
    ) -> Vec<(&'static str, Vec<CommandBatch>)> {
        let path: Vec<&str> = path.iter().map(AsRef::as_ref).collect();
        let mut pushes = Vec::new();
        for entry in &mut self.entries {
            if !paths_overlap(&path, entry.root()) {
                continue;
            }
            debug!(subsystem = entry.name(), path = %join_path(&path), "commit check");
            if let Some(batches) = entry.check(candidate, running) {
                pushes.push((entry.name(), batches));
            }
        }
        pushes
    }

    /// Eager check of every subsystem in table order.
    pub fn run_all(
        &mut self,
        candidate: &ConfigTree,
        running: &ConfigTree,
    ) -> Vec<(&'static str, Vec<CommandBatch>)> {
        self.entries
            .iter_mut()
            .filter_map(|entry| entry.check(candidate, running).map(|b| (entry.name(), b)))
            .collect()
    }
}
