// src/transport/wire.rs

//! JSON-lines codec for the management-plane protocol.
//!
//! One JSON object per line:
//! `{"type": "SET", "path": ["policy", "prefix-list", "p1", ...]}`.

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::engine::ProtocolEvent;
use crate::errors::Result;
use crate::validate::ValidationVerdict;

/// Message kinds understood on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigType {
    SubscribeMulti,
    Set,
    Delete,
    ValidateStart,
    ValidateEnd,
    ValidateSuccess,
    ValidateFailed,
    CommitStart,
    CommitEnd,
}

impl ConfigType {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigType::SubscribeMulti => "SUBSCRIBE_MULTI",
            ConfigType::Set => "SET",
            ConfigType::Delete => "DELETE",
            ConfigType::ValidateStart => "VALIDATE_START",
            ConfigType::ValidateEnd => "VALIDATE_END",
            ConfigType::ValidateSuccess => "VALIDATE_SUCCESS",
            ConfigType::ValidateFailed => "VALIDATE_FAILED",
            ConfigType::CommitStart => "COMMIT_START",
            ConfigType::CommitEnd => "COMMIT_END",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let kind = match s {
            "SUBSCRIBE_MULTI" => ConfigType::SubscribeMulti,
            "SET" => ConfigType::Set,
            "DELETE" => ConfigType::Delete,
            "VALIDATE_START" => ConfigType::ValidateStart,
            "VALIDATE_END" => ConfigType::ValidateEnd,
            "VALIDATE_SUCCESS" => ConfigType::ValidateSuccess,
            "VALIDATE_FAILED" => ConfigType::ValidateFailed,
            "COMMIT_START" => ConfigType::CommitStart,
            "COMMIT_END" => ConfigType::CommitEnd,
            _ => return None,
        };
        Some(kind)
    }
}

/// A single wire message.
///
/// `kind` stays a plain string so that unknown message types decode fine
/// and can be skipped by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigMessage {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl ConfigMessage {
    pub fn new(kind: ConfigType) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            ..Self::default()
        }
    }

    pub fn with_path<I, S>(kind: ConfigType, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            ..Self::new(kind)
        }
    }

    /// The subscription announcement sent right after connecting.
    pub fn subscribe(module: &str, port: u16, paths: &[String]) -> Self {
        Self {
            module: Some(module.to_string()),
            port: Some(port),
            path: paths.to_vec(),
            ..Self::new(ConfigType::SubscribeMulti)
        }
    }

    /// Reply for one validation cycle.
    pub fn verdict(verdict: &ValidationVerdict) -> Self {
        if verdict.passed {
            Self::new(ConfigType::ValidateSuccess)
        } else {
            Self {
                diagnostics: verdict.diagnostics.clone(),
                ..Self::new(ConfigType::ValidateFailed)
            }
        }
    }

    pub fn kind(&self) -> Option<ConfigType> {
        ConfigType::parse(&self.kind)
    }

    /// Serialize as a single line, without the trailing newline.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode_line(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line.trim())?)
    }

    /// Map an inbound message to an engine event.
    ///
    /// Returns `None` for unknown types and for messages that only flow
    /// from the agent to the store.
    pub fn to_event(&self) -> Option<ProtocolEvent> {
        let event = match self.kind()? {
            ConfigType::Set => ProtocolEvent::Set(self.path.clone()),
            ConfigType::Delete => ProtocolEvent::Delete(self.path.clone()),
            ConfigType::ValidateStart => ProtocolEvent::ValidateStart,
            ConfigType::ValidateEnd => ProtocolEvent::ValidateEnd,
            ConfigType::CommitStart => ProtocolEvent::CommitStart,
            ConfigType::CommitEnd => ProtocolEvent::CommitEnd,
            ConfigType::SubscribeMulti
            | ConfigType::ValidateSuccess
            | ConfigType::ValidateFailed => return None,
        };
        Some(event)
    }
}

/// Write `message` followed by a newline and flush.
pub async fn write_message<W>(writer: &mut W, message: &ConfigMessage) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = message.encode()?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}
