// src/tree/node.rs

use std::collections::BTreeMap;

use tracing::warn;

use crate::errors::{Result, SyncError};
use crate::tree::diff::differs;
use crate::tree::join_path;

/// One segment of a configuration path.
///
/// A node exclusively owns its children. Children are kept in an ordered map
/// so that enumeration (and therefore emitted command order for equal rule
/// numbers, dumps, logs) is deterministic; equality only depends on the set
/// of labels and the subtrees below them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigNode {
    children: BTreeMap<String, ConfigNode>,
}

impl ConfigNode {
    pub fn child(&self, label: &str) -> Option<&ConfigNode> {
        self.children.get(label)
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &ConfigNode)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// A rooted configuration trie (one instance each for running and candidate).
///
/// The root itself is never addressable: every lookup with an empty path
/// yields `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigTree {
    root: ConfigNode,
}

impl ConfigTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &ConfigNode {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Create every missing node along `path`. An empty path is a no-op.
    pub fn set<S: AsRef<str>>(&mut self, path: &[S]) {
        let mut node = &mut self.root;
        for label in path {
            node = node
                .children
                .entry(label.as_ref().to_string())
                .or_default();
        }
    }

    /// Unlink the last hop of `path` from its parent.
    ///
    /// Missing paths are a no-op. Ancestors left without children are kept:
    /// only the addressed segment is removed. Returns whether anything was
    /// removed.
    pub fn delete<S: AsRef<str>>(&mut self, path: &[S]) -> bool {
        let Some((last, parents)) = path.split_last() else {
            return false;
        };

        let mut node = &mut self.root;
        for label in parents {
            match node.children.get_mut(label.as_ref()) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.children.remove(last.as_ref()).is_some()
    }

    /// Follow `path` from the root.
    pub fn lookup<S: AsRef<str>>(&self, path: &[S]) -> Option<&ConfigNode> {
        if path.is_empty() {
            return None;
        }
        let mut node = &self.root;
        for label in path {
            node = node.children.get(label.as_ref())?;
        }
        Some(node)
    }

    pub fn contains<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.lookup(path).is_some()
    }

    /// Scalar value at `path`: the label of its only child.
    ///
    /// More than one child is an anomaly; it is logged and reported as no
    /// value. Use [`ConfigTree::try_value`] to turn it into an error.
    pub fn value<S: AsRef<str>>(&self, path: &[S]) -> Option<&str> {
        let node = self.lookup(path)?;
        match node.len() {
            0 => None,
            1 => node.labels().next(),
            _ => {
                warn!(
                    path = %join_path(path),
                    values = ?node.labels().collect::<Vec<_>>(),
                    "multiple values where a single value was expected"
                );
                None
            }
        }
    }

    /// Like [`ConfigTree::value`], but over-cardinality is an error.
    pub fn try_value<S: AsRef<str>>(&self, path: &[S]) -> Result<Option<&str>> {
        match self.lookup(path) {
            None => Ok(None),
            Some(node) if node.len() > 1 => Err(SyncError::Cardinality(join_path(path))),
            Some(node) => Ok(node.labels().next()),
        }
    }

    /// Every immediate child label under `path` (empty when absent).
    pub fn values<S: AsRef<str>>(&self, path: &[S]) -> Vec<String> {
        self.lookup(path)
            .map(|node| node.labels().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Whether the subtree at `path` differs between `self` and `other`.
    pub fn differs_at<S: AsRef<str>>(&self, other: &ConfigTree, path: &[S]) -> bool {
        differs(self.lookup(path), other.lookup(path))
    }
}
