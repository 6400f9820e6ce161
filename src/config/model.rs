// src/config/model.rs

use serde::Deserialize;

use crate::engine::{CommitMode, EngineOptions};

/// Agent configuration as read from a TOML file.
///
/// ```toml
/// [management]
/// address = "127.0.0.1:2650"
/// module = "quaggad"
/// port = 2699
/// subscribe = ["interfaces", "protocols", "policy"]
///
/// [executor]
/// program = "sudo"
/// args = ["vtysh"]
/// line_flag = "-c"
///
/// [commit]
/// mode = "lazy"
/// ```
///
/// All sections are optional and have reasonable defaults. This is the raw,
/// unchecked form; use `ConfigFile::try_from` to validate it.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub management: ManagementConfig,

    #[serde(default)]
    pub executor: ExecutorConfig,

    #[serde(default)]
    pub commit: CommitConfig,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub management: ManagementConfig,
    pub executor: ExecutorConfig,
    pub commit: CommitConfig,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            management: raw.management,
            executor: raw.executor,
            commit: raw.commit,
        }
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            mode: self.commit.mode,
            dump_state: self.commit.dump_state,
        }
    }
}

/// `[management]` section: where the configuration store lives and what
/// this agent subscribes to.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ManagementConfig {
    #[serde(default = "default_address")]
    pub address: String,

    /// Module name announced in the subscription.
    #[serde(default = "default_module")]
    pub module: String,

    /// Port announced in the subscription.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Top-level configuration paths to subscribe to.
    #[serde(default = "default_subscribe")]
    pub subscribe: Vec<String>,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Upper bound of the random reconnect delay.
    #[serde(default = "default_retry_interval_secs")]
    pub retry_interval_secs: u64,
}

fn default_address() -> String {
    "127.0.0.1:2650".to_string()
}

fn default_module() -> String {
    "quaggad".to_string()
}

fn default_port() -> u16 {
    2699
}

fn default_subscribe() -> Vec<String> {
    vec![
        "interfaces".to_string(),
        "protocols".to_string(),
        "policy".to_string(),
    ]
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_retry_interval_secs() -> u64 {
    5
}

impl Default for ManagementConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            module: default_module(),
            port: default_port(),
            subscribe: default_subscribe(),
            connect_timeout_secs: default_connect_timeout_secs(),
            retry_interval_secs: default_retry_interval_secs(),
        }
    }
}

/// `[executor]` section: how batches reach the routing daemon.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExecutorConfig {
    #[serde(default = "default_program")]
    pub program: String,

    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Flag placed before every command line of a batch.
    #[serde(default = "default_line_flag")]
    pub line_flag: String,
}

fn default_program() -> String {
    "sudo".to_string()
}

fn default_args() -> Vec<String> {
    vec!["vtysh".to_string()]
}

fn default_line_flag() -> String {
    "-c".to_string()
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            line_flag: default_line_flag(),
        }
    }
}

/// `[commit]` section.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CommitConfig {
    /// `"lazy"` (default) or `"eager"`.
    #[serde(default)]
    pub mode: CommitMode,

    #[serde(default)]
    pub dump_state: bool,
}
