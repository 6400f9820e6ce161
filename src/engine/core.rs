// src/engine/core.rs

//! Pure core state machine.
//!
//! This module contains a synchronous, deterministic "core" that consumes
//! [`ProtocolEvent`]s and produces:
//! - an updated configuration store and transaction state
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible for:
//! - reading events from the transport
//! - running command batches through the executor
//! - sending validation replies back
//!
//! The core is unit tested without any Tokio, sockets, or processes.

use tracing::{debug, info, warn};

use crate::commit::CommitTable;
use crate::engine::event_handlers::{
    CoreStep, Mutation, TransactionState, handle_commit_end, handle_commit_start,
    handle_mutation, handle_validate_end, handle_validate_start,
};
use crate::engine::{EngineOptions, ProtocolEvent, SessionPhase};
use crate::tree::ConfigTree;
use crate::validate::ValidatorSet;

/// Owner of the running and candidate trees.
///
/// There are no channels or Tokio types in here. Exactly one tree is the
/// mutation target at any instant, decided by the session phase.
#[derive(Debug)]
pub struct SyncEngine {
    running: ConfigTree,
    candidate: ConfigTree,
    txn: TransactionState,
    validators: ValidatorSet,
    commits: CommitTable,
    options: EngineOptions,
}

impl SyncEngine {
    pub fn new(validators: ValidatorSet, commits: CommitTable, options: EngineOptions) -> Self {
        Self {
            running: ConfigTree::new(),
            candidate: ConfigTree::new(),
            txn: TransactionState::default(),
            validators,
            commits,
            options,
        }
    }

    /// Engine wired with the routing-policy validators and generators.
    pub fn policy(options: EngineOptions) -> Self {
        Self::new(ValidatorSet::policy(), CommitTable::policy(), options)
    }

    pub fn running(&self) -> &ConfigTree {
        &self.running
    }

    pub fn candidate(&self) -> &ConfigTree {
        &self.candidate
    }

    pub fn phase(&self) -> SessionPhase {
        self.txn.phase
    }

    pub fn transaction(&self) -> &TransactionState {
        &self.txn
    }

    pub fn commits(&self) -> &CommitTable {
        &self.commits
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Drop all transaction state after a transport loss.
    ///
    /// Running survives; the next session starts from it.
    pub fn reset_session(&mut self) {
        self.txn = TransactionState::default();
        self.commits.reset_guards();
        info!("session reset; running configuration kept");
    }

    /// Handle a single protocol event, updating state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: ProtocolEvent) -> CoreStep {
        match event {
            ProtocolEvent::Subscribed => {
                if self.txn.phase == SessionPhase::Idle {
                    self.txn.phase = SessionPhase::Open;
                    info!("subscribed; session open");
                } else {
                    debug!(phase = ?self.txn.phase, "already subscribed");
                }
                CoreStep::idle()
            }
            ProtocolEvent::ShutdownRequested => CoreStep {
                commands: Vec::new(),
                keep_running: false,
            },
            ProtocolEvent::Disconnected => {
                self.reset_session();
                CoreStep::idle()
            }
            event if self.txn.phase == SessionPhase::Idle => {
                warn!(?event, "event before subscription ignored");
                CoreStep::idle()
            }
            ProtocolEvent::Set(path) => self.mutate(Mutation::Set, path),
            ProtocolEvent::Delete(path) => self.mutate(Mutation::Delete, path),
            ProtocolEvent::ValidateStart => {
                handle_validate_start(&self.running, &mut self.candidate, &mut self.txn)
            }
            ProtocolEvent::ValidateEnd => {
                handle_validate_end(&self.candidate, &mut self.txn, &self.validators)
            }
            ProtocolEvent::CommitStart => handle_commit_start(
                &self.running,
                &self.candidate,
                &mut self.txn,
                &mut self.commits,
                &self.options,
            ),
            ProtocolEvent::CommitEnd => handle_commit_end(
                &self.running,
                &self.candidate,
                &mut self.txn,
                &self.commits,
                &self.options,
            ),
        }
    }

    fn mutate(&mut self, kind: Mutation, path: Vec<String>) -> CoreStep {
        handle_mutation(
            &mut self.running,
            &mut self.candidate,
            &self.txn,
            &mut self.commits,
            kind,
            path,
        )
    }
}
