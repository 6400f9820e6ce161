// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::errors::Result;
use crate::exec::{CommandBatch, CommandExecutor};
use crate::validate::ValidationVerdict;

use super::core::SyncEngine;
use super::{CoreCommand, ProtocolEvent};

/// Counters for one session (one connection or one replayed script).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub events: usize,
    pub batches_executed: usize,
    pub batches_failed: usize,
    pub validations: usize,
    /// The session ended because shutdown was requested.
    pub shutdown: bool,
}

/// Drives the sync engine in response to `ProtocolEvent`s and delegates
/// command execution to a `CommandExecutor`.
///
/// This is a pure IO shell around `SyncEngine`, which contains all the
/// transaction semantics. It outlives individual sessions so that running
/// survives reconnects.
pub struct Runtime<E: CommandExecutor> {
    engine: SyncEngine,
    executor: E,
}

impl<E: CommandExecutor> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl<E: CommandExecutor> Runtime<E> {
    pub fn new(engine: SyncEngine, executor: E) -> Self {
        Self { engine, executor }
    }

    pub fn engine(&self) -> &SyncEngine {
        &self.engine
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Run one session.
    ///
    /// - Consumes `ProtocolEvent`s from `event_rx` until the channel closes
    ///   or shutdown is requested.
    /// - Feeds them into the core and executes the returned commands
    ///   strictly in order before reading the next event.
    /// - Sends validation verdicts to `reply_tx` when one is given.
    ///
    /// A closed channel is a transport loss: the engine's session state is
    /// reset before returning.
    pub async fn run_session(
        &mut self,
        mut event_rx: mpsc::Receiver<ProtocolEvent>,
        reply_tx: Option<mpsc::Sender<ValidationVerdict>>,
    ) -> Result<SessionStats> {
        info!("session started");
        let mut stats = SessionStats::default();

        loop {
            let event = match event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("event channel closed; ending session");
                    self.engine.step(ProtocolEvent::Disconnected);
                    break;
                }
            };

            debug!(?event, "runtime received event");
            stats.events += 1;

            let step = self.engine.step(event);

            for command in step.commands {
                self.execute_command(command, reply_tx.as_ref(), &mut stats)
                    .await?;
            }

            if !step.keep_running {
                info!("core requested exit; stopping session");
                stats.shutdown = true;
                break;
            }
        }

        info!(?stats, "session finished");
        Ok(stats)
    }

    async fn execute_command(
        &mut self,
        command: CoreCommand,
        reply_tx: Option<&mpsc::Sender<ValidationVerdict>>,
        stats: &mut SessionStats,
    ) -> Result<()> {
        match command {
            CoreCommand::Push { subsystem, batches } => {
                debug!(subsystem, batches = batches.len(), "pushing batches");
                for batch in batches {
                    self.execute_batch(subsystem, batch, stats).await;
                }
            }
            CoreCommand::Reply(verdict) => {
                stats.validations += 1;
                match reply_tx {
                    Some(tx) => {
                        if tx.send(verdict).await.is_err() {
                            warn!("reply channel closed; verdict dropped");
                        }
                    }
                    None => {
                        for line in &verdict.diagnostics {
                            warn!("{line}");
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Executor failures are logged and counted; later batches still run.
    async fn execute_batch(
        &mut self,
        subsystem: &'static str,
        batch: CommandBatch,
        stats: &mut SessionStats,
    ) {
        let shown = batch.to_string();
        match self.executor.execute(batch).await {
            Ok(output) => {
                stats.batches_executed += 1;
                if !output.trim().is_empty() {
                    debug!(subsystem, batch = %shown, output = %output.trim(), "executor output");
                }
            }
            Err(err) => {
                stats.batches_failed += 1;
                error!(subsystem, batch = %shown, error = %err, "batch failed");
            }
        }
    }
}
