// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, SyncError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::SyncError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_management(cfg)?;
    validate_executor(cfg)?;
    Ok(())
}

fn config_error(message: impl Into<String>) -> SyncError {
    SyncError::ConfigError(message.into())
}

fn validate_management(cfg: &RawConfigFile) -> Result<()> {
    let m = &cfg.management;

    if m.address.trim().is_empty() {
        return Err(config_error("[management].address must not be empty"));
    }
    if m.module.trim().is_empty() {
        return Err(config_error("[management].module must not be empty"));
    }
    if m.subscribe.is_empty() {
        return Err(config_error(
            "[management].subscribe must list at least one path",
        ));
    }
    if m.connect_timeout_secs == 0 {
        return Err(config_error(
            "[management].connect_timeout_secs must be >= 1 (got 0)",
        ));
    }
    if m.retry_interval_secs == 0 {
        return Err(config_error(
            "[management].retry_interval_secs must be >= 1 (got 0)",
        ));
    }

    Ok(())
}

fn validate_executor(cfg: &RawConfigFile) -> Result<()> {
    let e = &cfg.executor;

    if e.program.trim().is_empty() {
        return Err(config_error("[executor].program must not be empty"));
    }
    if e.line_flag.trim().is_empty() {
        return Err(config_error("[executor].line_flag must not be empty"));
    }

    Ok(())
}
