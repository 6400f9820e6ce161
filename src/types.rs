// src/types.rs

use std::str::FromStr;
use serde::Deserialize;

/// When commit generators run inside a commit window.
///
/// - `Lazy`: a subsystem is checked the first time a mutation touching its
///   root arrives in the window (default behaviour).
/// - `Eager`: every subsystem is checked in table order as soon as the
///   window opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CommitMode {
    #[default]
    Lazy,
    Eager,
}

impl FromStr for CommitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lazy" => Ok(CommitMode::Lazy),
            "eager" => Ok(CommitMode::Eager),
            other => Err(format!(
                "invalid commit mode: {other} (expected \"lazy\" or \"eager\")"
            )),
        }
    }
}
