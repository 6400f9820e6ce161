// src/transport/mod.rs

//! Event sources for the runtime: a live TCP connection to the
//! configuration store, or an offline event script.

pub mod backoff;
pub mod client;
pub mod script;
pub mod wire;

use tokio::sync::mpsc;

use crate::engine::{ProtocolEvent, Runtime, SessionStats};
use crate::errors::{Result, SyncError};
use crate::exec::CommandExecutor;

pub use client::run_client;
pub use script::{load_script, parse_script};
pub use wire::{ConfigMessage, ConfigType};

/// Feed a fixed event sequence through `runtime` as one session.
///
/// Verdicts have no recipient here; failed ones are logged.
pub async fn replay<E: CommandExecutor>(
    runtime: &mut Runtime<E>,
    events: Vec<ProtocolEvent>,
) -> Result<SessionStats> {
    let (tx, rx) = mpsc::channel(events.len().max(1));
    for event in events {
        tx.send(event)
            .await
            .map_err(|_| SyncError::TransportError("replay channel closed".to_string()))?;
    }
    drop(tx);
    runtime.run_session(rx, None).await
}
