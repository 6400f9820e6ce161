// src/engine/event_handlers.rs

//! Event handling logic for the sync engine core.

use tracing::{debug, info, warn};

use crate::commit::CommitTable;
use crate::engine::{CommitMode, EngineOptions, SessionPhase};
use crate::exec::CommandBatch;
use crate::tree::{ConfigPath, ConfigTree, dump_against, join_path};
use crate::validate::{ValidationVerdict, ValidatorSet};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Run these batches, in order, for one subsystem.
    Push {
        subsystem: &'static str,
        batches: Vec<CommandBatch>,
    },
    /// Send a validation verdict back to the management plane.
    Reply(ValidationVerdict),
}

/// Decision returned by the core after handling a single `ProtocolEvent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    /// Commands the IO shell should execute, in order.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    pub fn idle() -> Self {
        Self {
            commands: Vec::new(),
            keep_running: true,
        }
    }

    fn with(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

/// Transaction bookkeeping that does not live in the trees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionState {
    pub phase: SessionPhase,
    pub commit_open: bool,
    /// Verdict of the last `ValidateEnd`, consumed when the commit ends.
    pub verdict: Option<ValidationVerdict>,
}

impl TransactionState {
    /// Generators may run: inside a commit window after a passed validation.
    pub fn commit_allowed(&self) -> bool {
        self.commit_open && self.verdict.as_ref().is_some_and(|v| v.passed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Set,
    Delete,
}

fn push_commands(pushes: Vec<(&'static str, Vec<CommandBatch>)>) -> Vec<CoreCommand> {
    pushes
        .into_iter()
        .filter(|(_, batches)| !batches.is_empty())
        .map(|(subsystem, batches)| CoreCommand::Push { subsystem, batches })
        .collect()
}

fn apply(tree: &mut ConfigTree, kind: Mutation, path: &ConfigPath) {
    match kind {
        Mutation::Set => tree.set(path),
        Mutation::Delete => {
            if !tree.delete(path) {
                debug!(path = %join_path(path), "delete of missing path");
            }
        }
    }
}

/// Apply a `Set`/`Delete`.
///
/// While validating only the candidate changes. Otherwise running changes,
/// and inside an allowed commit window the lazy commit check runs for the
/// touched path first, so generators still see the pre-mutation running.
pub fn handle_mutation(
    running: &mut ConfigTree,
    candidate: &mut ConfigTree,
    txn: &TransactionState,
    commits: &mut CommitTable,
    kind: Mutation,
    path: ConfigPath,
) -> CoreStep {
    match txn.phase {
        SessionPhase::Idle => {
            warn!(path = %join_path(&path), ?kind, "mutation before subscription ignored");
            CoreStep::idle()
        }
        SessionPhase::Validating => {
            apply(candidate, kind, &path);
            CoreStep::idle()
        }
        SessionPhase::Open => {
            let commands = if txn.commit_allowed() {
                push_commands(commits.touch(&path, candidate, running))
            } else {
                Vec::new()
            };
            apply(running, kind, &path);
            CoreStep::with(commands)
        }
    }
}

pub fn handle_validate_start(
    running: &ConfigTree,
    candidate: &mut ConfigTree,
    txn: &mut TransactionState,
) -> CoreStep {
    *candidate = running.clone();
    txn.phase = SessionPhase::Validating;
    txn.verdict = None;
    debug!("validation started; candidate copied from running");
    CoreStep::idle()
}

pub fn handle_validate_end(
    candidate: &ConfigTree,
    txn: &mut TransactionState,
    validators: &ValidatorSet,
) -> CoreStep {
    let verdict = if txn.phase == SessionPhase::Validating {
        validators.run_all(candidate)
    } else {
        warn!(phase = ?txn.phase, "validate end without validate start");
        ValidationVerdict {
            passed: false,
            diagnostics: vec!["validation was not started.".to_string()],
        }
    };
    txn.phase = SessionPhase::Open;

    if verdict.passed {
        info!("validation passed");
    } else {
        warn!(diagnostics = verdict.diagnostics.len(), "validation failed");
    }
    txn.verdict = Some(verdict.clone());
    CoreStep::with(vec![CoreCommand::Reply(verdict)])
}

pub fn handle_commit_start(
    running: &ConfigTree,
    candidate: &ConfigTree,
    txn: &mut TransactionState,
    commits: &mut CommitTable,
    options: &EngineOptions,
) -> CoreStep {
    commits.reset_guards();
    txn.commit_open = true;

    if !txn.commit_allowed() {
        warn!("commit without a passed validation; no commands will be pushed");
        return CoreStep::idle();
    }

    info!(mode = ?options.mode, "commit started");
    match options.mode {
        CommitMode::Lazy => CoreStep::idle(),
        CommitMode::Eager => CoreStep::with(push_commands(commits.run_all(candidate, running))),
    }
}

pub fn handle_commit_end(
    running: &ConfigTree,
    candidate: &ConfigTree,
    txn: &mut TransactionState,
    commits: &CommitTable,
    options: &EngineOptions,
) -> CoreStep {
    txn.commit_open = false;
    txn.verdict = None;
    info!(committed = ?commits.guards(), "commit ended");

    if options.dump_state {
        debug!("running vs candidate:\n{}", dump_against(running, candidate));
    }
    CoreStep::idle()
}
