// src/exec/vtysh.rs

//! Process-backed executor.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Context;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::model::ExecutorConfig;
use crate::errors::{Result, SyncError};
use crate::exec::{CommandBatch, CommandExecutor};

/// Runs every batch as one invocation of the daemon's shell:
/// `program args... <line_flag> line1 <line_flag> line2 ...`.
#[derive(Debug, Clone)]
pub struct VtyshExecutor {
    program: String,
    args: Vec<String>,
    line_flag: String,
}

impl VtyshExecutor {
    pub fn new(program: impl Into<String>, args: Vec<String>, line_flag: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args,
            line_flag: line_flag.into(),
        }
    }

    pub fn from_config(cfg: &ExecutorConfig) -> Self {
        Self::new(cfg.program.clone(), cfg.args.clone(), cfg.line_flag.clone())
    }

    /// Full argument vector for `batch` (everything after the program).
    pub fn argv(&self, batch: &CommandBatch) -> Vec<String> {
        let mut argv = self.args.clone();
        for line in batch.lines() {
            argv.push(self.line_flag.clone());
            argv.push(line.clone());
        }
        argv
    }

    async fn run(&self, batch: CommandBatch) -> Result<String> {
        let argv = self.argv(&batch);
        debug!(program = %self.program, ?argv, "spawning executor process");

        let output = Command::new(&self.program)
            .args(&argv)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("spawning '{}' for batch '{batch}'", self.program))?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(SyncError::ExecutorError(format!(
                "'{}' exited with {} for batch '{batch}': {}",
                self.program,
                output.status.code().unwrap_or(-1),
                text.trim()
            )));
        }

        info!(batch = %batch, "batch applied");
        Ok(text)
    }
}

impl CommandExecutor for VtyshExecutor {
    fn execute(
        &mut self,
        batch: CommandBatch,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>> {
        Box::pin(self.run(batch))
    }
}
