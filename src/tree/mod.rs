// src/tree/mod.rs

//! Hierarchical configuration model.
//!
//! - [`node`] holds the path trie used for both the running and the
//!   candidate configuration.
//! - [`diff`] decides whether two subtrees are structurally different.
//! - [`dump`] renders a running/candidate pair side by side for debugging.
//!
//! A configuration *value* lives inside the tree as the lone child label of
//! its path: `policy prefix-list PL1 rule 10 action permit` stores `permit`
//! as the only child of `.../rule/10/action`.

pub mod diff;
pub mod dump;
pub mod node;

pub use diff::differs;
pub use dump::dump_against;
pub use node::{ConfigNode, ConfigTree};

/// A configuration path as delivered by the management plane.
pub type ConfigPath = Vec<String>;

/// Render a path the way operators type it (space separated).
pub fn join_path<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build an owned path from string slices.
pub fn path_from<S: AsRef<str>>(labels: &[S]) -> ConfigPath {
    labels.iter().map(|s| s.as_ref().to_string()).collect()
}

/// True if `a` is a prefix of `b` or `b` is a prefix of `a`.
pub fn paths_overlap<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| x.as_ref() == y.as_ref())
}
