// src/exec/batch.rs

use std::fmt;

/// First line of every policy batch.
pub const CONFIGURE_TERMINAL: &str = "configure terminal";

/// An ordered list of native command lines run by one executor invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandBatch {
    lines: Vec<String>,
}

impl CommandBatch {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// A batch that enters configuration mode before running `lines`.
    pub fn configure<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut batch = Self::new([CONFIGURE_TERMINAL]);
        batch.lines.extend(lines.into_iter().map(Into::into));
        batch
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The last line: the command the batch exists to run.
    pub fn command(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }
}

impl fmt::Display for CommandBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join(" / "))
    }
}
