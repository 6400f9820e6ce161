// src/lib.rs

pub mod cli;
pub mod commit;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod policy;
pub mod transport;
pub mod tree;
pub mod types;
pub mod validate;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::loader::load_or_default;
use crate::config::model::ConfigFile;
use crate::engine::{Runtime, SyncEngine};
use crate::exec::{CommandExecutor, DryRunExecutor, VtyshExecutor};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the sync engine with the policy validators and commit generators
/// - executor (real daemon shell or dry-run printer)
/// - event source (store connection or replayed script)
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(args.config.as_deref()).context("loading configuration")?;

    if args.check_config {
        print_config(&cfg);
        return Ok(());
    }

    let engine = SyncEngine::policy(cfg.engine_options());

    if args.dry_run {
        drive(Runtime::new(engine, DryRunExecutor::new()), &cfg, &args).await
    } else {
        let executor = VtyshExecutor::from_config(&cfg.executor);
        drive(Runtime::new(engine, executor), &cfg, &args).await
    }
}

async fn drive<E: CommandExecutor>(
    mut runtime: Runtime<E>,
    cfg: &ConfigFile,
    args: &CliArgs,
) -> Result<()> {
    if let Some(path) = &args.replay {
        let events = transport::load_script(path)
            .with_context(|| format!("loading event script {}", path.display()))?;
        info!(events = events.len(), script = %path.display(), "replaying event script");
        let stats = transport::replay(&mut runtime, events).await?;
        info!(?stats, "replay finished");
        return Ok(());
    }

    // Ctrl-C → graceful shutdown.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        let _ = shutdown_tx.send(true);
        // Keep the sender alive so receivers observe `true`, not a close.
        std::future::pending::<()>().await;
    });

    transport::run_client(&mut runtime, &cfg.management, shutdown_rx).await?;
    info!("shutdown complete");
    Ok(())
}

fn print_config(cfg: &ConfigFile) {
    let m = &cfg.management;
    let e = &cfg.executor;
    println!("confsync configuration");
    println!("  management.address = {}", m.address);
    println!("  management.module = {}", m.module);
    println!("  management.port = {}", m.port);
    println!("  management.subscribe = {:?}", m.subscribe);
    println!("  management.connect_timeout_secs = {}", m.connect_timeout_secs);
    println!("  management.retry_interval_secs = {}", m.retry_interval_secs);
    println!("  executor.program = {}", e.program);
    println!("  executor.args = {:?}", e.args);
    println!("  executor.line_flag = {}", e.line_flag);
    println!("  commit.mode = {:?}", cfg.commit.mode);
    println!("  commit.dump_state = {}", cfg.commit.dump_state);
}
