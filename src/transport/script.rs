// src/transport/script.rs

//! Offline event scripts.
//!
//! ```text
//! # add a prefix list
//! validate-start
//! set policy prefix-list p1 rule 10 action permit
//! set policy prefix-list p1 rule 10 prefix 10.0.0.0/8
//! validate-end
//! commit-start
//! set policy prefix-list p1 rule 10 action permit
//! set policy prefix-list p1 rule 10 prefix 10.0.0.0/8
//! commit-end
//! ```
//!
//! A script starts subscribed; an explicit `subscribe` line is accepted
//! and harmless.

use std::fs;
use std::path::Path;

use crate::engine::ProtocolEvent;
use crate::errors::{Result, SyncError};

pub fn load_script(path: impl AsRef<Path>) -> Result<Vec<ProtocolEvent>> {
    let text = fs::read_to_string(path.as_ref())?;
    parse_script(&text)
}

pub fn parse_script(text: &str) -> Result<Vec<ProtocolEvent>> {
    let mut events = vec![ProtocolEvent::Subscribed];

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        events.push(parse_line(idx + 1, line)?);
    }

    Ok(events)
}

fn parse_line(line_no: usize, line: &str) -> Result<ProtocolEvent> {
    let mut words = line.split_whitespace();
    let Some(keyword) = words.next() else {
        return Err(script_error(line_no, "empty line"));
    };
    let rest: Vec<String> = words.map(str::to_string).collect();

    let event = match keyword {
        "set" | "delete" => {
            if rest.is_empty() {
                return Err(script_error(
                    line_no,
                    format!("'{keyword}' needs at least one path label"),
                ));
            }
            if keyword == "set" {
                ProtocolEvent::Set(rest)
            } else {
                ProtocolEvent::Delete(rest)
            }
        }
        other => {
            if !rest.is_empty() {
                return Err(script_error(
                    line_no,
                    format!("'{other}' takes no arguments"),
                ));
            }
            match other {
                "subscribe" => ProtocolEvent::Subscribed,
                "validate-start" => ProtocolEvent::ValidateStart,
                "validate-end" => ProtocolEvent::ValidateEnd,
                "commit-start" => ProtocolEvent::CommitStart,
                "commit-end" => ProtocolEvent::CommitEnd,
                _ => {
                    return Err(script_error(
                        line_no,
                        format!("unknown event '{other}'"),
                    ));
                }
            }
        }
    };

    Ok(event)
}

fn script_error(line: usize, message: impl Into<String>) -> SyncError {
    SyncError::ScriptError {
        line,
        message: message.into(),
    }
}
