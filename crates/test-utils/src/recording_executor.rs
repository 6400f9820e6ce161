use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use confsync::errors::{Result, SyncError};
use confsync::exec::{CommandBatch, CommandExecutor};

/// A fake executor that:
/// - records every batch it is handed, in order
/// - fails batches containing a configured substring, after recording them.
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    executed: Arc<Mutex<Vec<CommandBatch>>>,
    fail_on: Option<String>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any batch with a line containing `needle`.
    pub fn failing_on(needle: &str) -> Self {
        Self {
            fail_on: Some(needle.to_string()),
            ..Self::default()
        }
    }

    /// Shared handle on the recorded batches.
    pub fn handle(&self) -> Arc<Mutex<Vec<CommandBatch>>> {
        Arc::clone(&self.executed)
    }

    pub fn batches(&self) -> Vec<CommandBatch> {
        self.executed.lock().unwrap().clone()
    }

    /// The last line of every recorded batch.
    pub fn commands(&self) -> Vec<String> {
        self.batches()
            .iter()
            .filter_map(|b| b.command().map(str::to_string))
            .collect()
    }
}

impl CommandExecutor for RecordingExecutor {
    fn execute(
        &mut self,
        batch: CommandBatch,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>> {
        let executed = Arc::clone(&self.executed);
        let fail_on = self.fail_on.clone();

        Box::pin(async move {
            let failed = fail_on
                .as_deref()
                .is_some_and(|needle| batch.lines().iter().any(|l| l.contains(needle)));

            let shown = batch.to_string();
            executed.lock().unwrap().push(batch);

            if failed {
                return Err(SyncError::ExecutorError(format!("injected failure: {shown}")));
            }
            Ok(String::new())
        })
    }
}
