// src/engine/mod.rs

//! Configuration sync engine.
//!
//! This module ties together:
//! - the running/candidate configuration trees
//! - the validate → commit transaction protocol
//! - the commit table (one generator + guard per subsystem)
//! - the main runtime loop that reacts to:
//!   - management-plane mutations and transaction markers
//!   - validation replies that must go back to the management plane
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use crate::tree::ConfigPath;

/// Where the session is in the transaction protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Not subscribed yet; everything but `Subscribed` is ignored.
    #[default]
    Idle,
    /// Subscribed; mutations go to running.
    Open,
    /// Between `ValidateStart` and `ValidateEnd`; mutations go to candidate.
    Validating,
}

/// Options used by the core.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    pub mode: CommitMode,
    /// Log a running/candidate dump at debug level when a commit ends.
    pub dump_state: bool,
}

/// Events flowing into the engine from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolEvent {
    /// The subscription was accepted; the session is open.
    Subscribed,
    Set(ConfigPath),
    Delete(ConfigPath),
    ValidateStart,
    ValidateEnd,
    CommitStart,
    CommitEnd,
    /// The transport dropped; transaction state is discarded.
    Disconnected,
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod event_handlers;
pub mod runtime;

pub use core::SyncEngine;
pub use event_handlers::{CoreCommand, CoreStep, TransactionState};
pub use crate::types::CommitMode;
pub use crate::validate::ValidationVerdict;
pub use runtime::{Runtime, SessionStats};
