// src/tree/dump.rs

use std::collections::BTreeSet;
use std::fmt::Write;

use crate::tree::node::{ConfigNode, ConfigTree};

/// Render running and candidate side by side.
///
/// Every label present on either side is printed once, sorted, with a
/// two-character marker:
/// - `"  "` present in both
/// - `"- "` only in running (will be removed)
/// - `"+ "` only in candidate (will be added)
///
/// Each level of depth indents by four spaces.
pub fn dump_against(running: &ConfigTree, candidate: &ConfigTree) -> String {
    let mut out = String::new();
    dump_level(Some(running.root()), Some(candidate.root()), 0, &mut out);
    out
}

fn dump_level(
    running: Option<&ConfigNode>,
    candidate: Option<&ConfigNode>,
    depth: usize,
    out: &mut String,
) {
    let labels: BTreeSet<&str> = running
        .into_iter()
        .chain(candidate)
        .flat_map(|n| n.labels())
        .collect();

    for label in labels {
        let r = running.and_then(|n| n.child(label));
        let c = candidate.and_then(|n| n.child(label));
        let marker = match (r, c) {
            (Some(_), Some(_)) => "  ",
            (Some(_), None) => "- ",
            (None, Some(_)) => "+ ",
            (None, None) => "? ",
        };
        let _ = writeln!(out, "{marker}{}{label}", "    ".repeat(depth));
        dump_level(r, c, depth + 1, out);
    }
}
