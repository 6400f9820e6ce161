// src/transport/client.rs

//! TCP client for the configuration store.
//!
//! One connection is one session: the client subscribes, forwards inbound
//! messages to the runtime as `ProtocolEvent`s and writes validation
//! verdicts back. When the connection drops the engine resets its
//! transaction state and the client reconnects after a random delay.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::config::ManagementConfig;
use crate::engine::{ProtocolEvent, Runtime, SessionStats};
use crate::errors::{Result, SyncError};
use crate::exec::CommandExecutor;
use crate::validate::ValidationVerdict;

use super::backoff::reconnect_delay;
use super::wire::{ConfigMessage, write_message};

const EVENT_QUEUE: usize = 256;
const REPLY_QUEUE: usize = 16;

/// Connect, serve and reconnect until `shutdown` flips to `true`.
///
/// A session that ends with an error is handled like a failed connect:
/// logged, then retried after the backoff delay.
pub async fn run_client<E: CommandExecutor>(
    runtime: &mut Runtime<E>,
    cfg: &ManagementConfig,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    loop {
        if *shutdown.borrow() {
            return Ok(());
        }

        match connect(cfg).await {
            Ok(stream) => {
                info!(address = %cfg.address, "connected to configuration store");
                match serve_connection(runtime, stream, cfg, shutdown.clone()).await {
                    Ok(stats) if stats.shutdown => return Ok(()),
                    Ok(_) => {}
                    Err(err) => warn!(error = %err, "session with configuration store failed"),
                }
            }
            Err(err) => warn!(error = %err, "connection attempt failed"),
        }

        let delay = reconnect_delay(cfg.retry_interval_secs);
        info!(delay_secs = delay.as_secs(), "reconnecting");
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown.changed() => return Ok(()),
        }
    }
}

async fn connect(cfg: &ManagementConfig) -> Result<TcpStream> {
    let limit = Duration::from_secs(cfg.connect_timeout_secs);
    match tokio::time::timeout(limit, TcpStream::connect(&cfg.address)).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(err)) => Err(SyncError::TransportError(format!(
            "connect to {} failed: {err}",
            cfg.address
        ))),
        Err(_) => Err(SyncError::TransportError(format!(
            "connect to {} timed out after {}s",
            cfg.address, cfg.connect_timeout_secs
        ))),
    }
}

async fn serve_connection<E: CommandExecutor>(
    runtime: &mut Runtime<E>,
    stream: TcpStream,
    cfg: &ManagementConfig,
    shutdown: watch::Receiver<bool>,
) -> Result<SessionStats> {
    let (read_half, mut write_half) = stream.into_split();

    let hello = ConfigMessage::subscribe(&cfg.module, cfg.port, &cfg.subscribe);
    write_message(&mut write_half, &hello).await?;
    debug!(module = %cfg.module, paths = ?cfg.subscribe, "subscription sent");

    let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE);
    let (reply_tx, reply_rx) = mpsc::channel(REPLY_QUEUE);

    event_tx
        .send(ProtocolEvent::Subscribed)
        .await
        .map_err(|_| SyncError::TransportError("event channel closed".to_string()))?;

    let reader = tokio::spawn(read_events(read_half, event_tx, shutdown));
    let writer = tokio::spawn(write_replies(write_half, reply_rx));

    let result = runtime.run_session(event_rx, Some(reply_tx)).await;

    reader.abort();
    writer.abort();
    result
}

async fn read_events(
    read_half: OwnedReadHalf,
    tx: mpsc::Sender<ProtocolEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut lines = BufReader::new(read_half).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if let Some(event) = decode_event(&line) {
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                }
                Ok(None) => {
                    info!("configuration store closed the connection");
                    break;
                }
                Err(err) => {
                    warn!(error = %err, "read from configuration store failed");
                    break;
                }
            },
            changed = shutdown.changed() => {
                if changed.is_ok() && *shutdown.borrow() {
                    let _ = tx.send(ProtocolEvent::ShutdownRequested).await;
                }
                break;
            }
        }
    }
}

fn decode_event(line: &str) -> Option<ProtocolEvent> {
    if line.trim().is_empty() {
        return None;
    }
    match ConfigMessage::decode_line(line) {
        Ok(message) => {
            let event = message.to_event();
            if event.is_none() {
                debug!(kind = %message.kind, "ignoring message");
            }
            event
        }
        Err(err) => {
            warn!(error = %err, "undecodable message skipped");
            None
        }
    }
}

async fn write_replies(
    mut write_half: OwnedWriteHalf,
    mut rx: mpsc::Receiver<ValidationVerdict>,
) {
    while let Some(verdict) = rx.recv().await {
        let reply = ConfigMessage::verdict(&verdict);
        if let Err(err) = write_message(&mut write_half, &reply).await {
            warn!(error = %err, "failed to send validation reply");
            break;
        }
    }
}
