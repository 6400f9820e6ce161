// src/validate/mod.rs

//! Candidate validation.
//!
//! Validators are pure predicates over the candidate tree. Every validator
//! runs (there is no short-circuit) so the management plane sees every
//! problem of a transaction at once; the verdict is the AND of all results.

pub mod checks;
pub mod policy;

use std::fmt;

use tracing::warn;

use crate::tree::{ConfigTree, join_path};

/// Collected failure lines: the offending config path followed by a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    lines: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one failure at `path`.
    pub fn report<S: AsRef<str>>(&mut self, path: &[S], message: impl Into<String>) {
        self.lines.push(join_path(path));
        self.lines.push(message.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

pub trait Validator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Check `candidate`, appending to `diagnostics` on failure.
    fn validate(&self, candidate: &ConfigTree, diagnostics: &mut Diagnostics) -> bool;
}

/// Result of one validation cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationVerdict {
    pub passed: bool,
    pub diagnostics: Vec<String>,
}

impl ValidationVerdict {
    pub fn success() -> Self {
        Self {
            passed: true,
            diagnostics: Vec::new(),
        }
    }
}

#[derive(Default)]
pub struct ValidatorSet {
    validators: Vec<Box<dyn Validator>>,
}

impl fmt::Debug for ValidatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.validators.iter().map(|v| v.name()).collect();
        f.debug_struct("ValidatorSet").field("validators", &names).finish()
    }
}

impl ValidatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routing-policy validators plus the scalar cardinality check.
    pub fn policy() -> Self {
        let mut set = Self::new();
        for validator in policy::validators() {
            set.validators.push(validator);
        }
        set
    }

    pub fn register<V: Validator + 'static>(&mut self, validator: V) {
        self.validators.push(Box::new(validator));
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Run every validator and AND the results.
    pub fn run_all(&self, candidate: &ConfigTree) -> ValidationVerdict {
        let mut diagnostics = Diagnostics::new();
        let mut passed = true;
        for validator in &self.validators {
            if !validator.validate(candidate, &mut diagnostics) {
                warn!(validator = validator.name(), "validation failed");
                passed = false;
            }
        }
        ValidationVerdict {
            passed,
            diagnostics: diagnostics.into_lines(),
        }
    }
}
