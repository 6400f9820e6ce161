// src/exec/dry_run.rs

use std::future::Future;
use std::pin::Pin;

use tracing::info;

use crate::errors::Result;
use crate::exec::{CommandBatch, CommandExecutor};

/// Prints batches instead of running them.
#[derive(Debug, Default)]
pub struct DryRunExecutor {
    executed: usize,
}

impl DryRunExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn executed(&self) -> usize {
        self.executed
    }
}

impl CommandExecutor for DryRunExecutor {
    fn execute(
        &mut self,
        batch: CommandBatch,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>> {
        Box::pin(async move {
            self.executed += 1;
            info!(seq = self.executed, batch = %batch, "dry-run batch");
            println!("{batch}");
            Ok(String::new())
        })
    }
}
