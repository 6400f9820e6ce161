#![allow(dead_code)]

use confsync::engine::{CoreCommand, ProtocolEvent, SyncEngine};
use confsync::exec::CommandBatch;
use confsync::tree::{ConfigPath, ConfigTree};
use confsync::validate::ValidationVerdict;

/// Split a space-separated path: `"policy prefix-list p1"`.
pub fn path(s: &str) -> ConfigPath {
    s.split_whitespace().map(str::to_string).collect()
}

/// Build a tree from space-separated paths.
pub fn tree(paths: &[&str]) -> ConfigTree {
    let mut t = ConfigTree::new();
    for p in paths {
        t.set(&path(p));
    }
    t
}

enum Mutation {
    Set(ConfigPath),
    Delete(ConfigPath),
}

impl Mutation {
    fn event(&self) -> ProtocolEvent {
        match self {
            Mutation::Set(p) => ProtocolEvent::Set(p.clone()),
            Mutation::Delete(p) => ProtocolEvent::Delete(p.clone()),
        }
    }
}

/// Builder for one validate → commit transaction.
///
/// The mutations are delivered twice, as the store does: once between the
/// validate markers and once between the commit markers.
#[derive(Default)]
pub struct TransactionBuilder {
    mutations: Vec<Mutation>,
    skip_commit: bool,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, p: &str) -> Self {
        self.mutations.push(Mutation::Set(path(p)));
        self
    }

    pub fn delete(mut self, p: &str) -> Self {
        self.mutations.push(Mutation::Delete(path(p)));
        self
    }

    /// Only emit the validation half.
    pub fn validate_only(mut self) -> Self {
        self.skip_commit = true;
        self
    }

    pub fn events(&self) -> Vec<ProtocolEvent> {
        let mut out = vec![ProtocolEvent::ValidateStart];
        out.extend(self.mutations.iter().map(Mutation::event));
        out.push(ProtocolEvent::ValidateEnd);
        if !self.skip_commit {
            out.push(ProtocolEvent::CommitStart);
            out.extend(self.mutations.iter().map(Mutation::event));
            out.push(ProtocolEvent::CommitEnd);
        }
        out
    }

    /// Same events with a leading `Subscribed`.
    pub fn subscribed_events(&self) -> Vec<ProtocolEvent> {
        let mut out = vec![ProtocolEvent::Subscribed];
        out.extend(self.events());
        out
    }
}

/// Everything the core emitted while stepping through some events.
#[derive(Debug, Default)]
pub struct StepLog {
    pub pushes: Vec<(&'static str, CommandBatch)>,
    pub verdicts: Vec<ValidationVerdict>,
}

impl StepLog {
    /// Last line of every pushed batch, in emission order.
    pub fn commands(&self) -> Vec<String> {
        self.pushes
            .iter()
            .filter_map(|(_, b)| b.command().map(str::to_string))
            .collect()
    }

    pub fn subsystems(&self) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = Vec::new();
        for (name, _) in &self.pushes {
            if out.last() != Some(name) {
                out.push(*name);
            }
        }
        out
    }
}

/// Step `engine` through `events` synchronously and collect its output.
pub fn drive(engine: &mut SyncEngine, events: Vec<ProtocolEvent>) -> StepLog {
    let mut log = StepLog::default();
    for event in events {
        let step = engine.step(event);
        for command in step.commands {
            match command {
                CoreCommand::Push { subsystem, batches } => {
                    log.pushes
                        .extend(batches.into_iter().map(|b| (subsystem, b)));
                }
                CoreCommand::Reply(verdict) => log.verdicts.push(verdict),
            }
        }
    }
    log
}
