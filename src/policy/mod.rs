// src/policy/mod.rs

//! Routing-policy configuration schema.
//!
//! Commit generators and validators both read policy elements out of a
//! [`ConfigTree`]; this module is the one place that knows where things live:
//!
//! - subsystem roots (`policy access-list`, `policy route-map`, ...)
//! - [`rules`]: typed readers for list rules
//! - [`route_map`]: the route-map rule attribute table
//! - [`RuleView`]: a cursor positioned on one `<root> <element> rule <n>`

pub mod route_map;
pub mod rules;

use crate::tree::{ConfigPath, ConfigTree};

pub const ACCESS_LIST: &[&str] = &["policy", "access-list"];
pub const ACCESS_LIST6: &[&str] = &["policy", "access-list6"];
pub const AS_PATH_LIST: &[&str] = &["policy", "as-path-list"];
pub const COMMUNITY_LIST: &[&str] = &["policy", "community-list"];
pub const PREFIX_LIST: &[&str] = &["policy", "prefix-list"];
pub const PREFIX_LIST6: &[&str] = &["policy", "prefix-list6"];
pub const ROUTE_MAP: &[&str] = &["policy", "route-map"];

/// Path of a named element below a subsystem root.
pub fn element_path(root: &[&str], element: &str) -> ConfigPath {
    let mut path: ConfigPath = root.iter().map(|s| s.to_string()).collect();
    path.push(element.to_string());
    path
}

/// Path of the `rule` container of an element.
pub fn rules_path(root: &[&str], element: &str) -> ConfigPath {
    let mut path = element_path(root, element);
    path.push("rule".to_string());
    path
}

/// Rule labels of an element ordered for emission.
///
/// Numeric labels come first in ascending numeric order; labels that do not
/// parse as integers follow in the order the tree enumerates them.
pub fn sorted_rules(tree: &ConfigTree, root: &[&str], element: &str) -> Vec<String> {
    sort_rules(tree.values(&rules_path(root, element)))
}

pub fn sort_rules(rules: Vec<String>) -> Vec<String> {
    let mut numbered = Vec::new();
    let mut other = Vec::new();
    for rule in rules {
        match rule.parse::<i64>() {
            Ok(n) => numbered.push((n, rule)),
            Err(_) => other.push(rule),
        }
    }
    numbered.sort_by_key(|(n, _)| *n);
    numbered.into_iter().map(|(_, r)| r).chain(other).collect()
}

/// Read-only cursor on `<root> <element> rule <rule>` of one tree.
#[derive(Debug, Clone)]
pub struct RuleView<'a> {
    tree: &'a ConfigTree,
    base: ConfigPath,
}

impl<'a> RuleView<'a> {
    /// `None` when the rule does not exist in `tree`.
    pub fn open(tree: &'a ConfigTree, root: &[&str], element: &str, rule: &str) -> Option<Self> {
        let mut base = rules_path(root, element);
        base.push(rule.to_string());
        if !tree.contains(&base) {
            return None;
        }
        Some(Self { tree, base })
    }

    pub fn path(&self, rel: &[&str]) -> ConfigPath {
        let mut path = self.base.clone();
        path.extend(rel.iter().map(|s| s.to_string()));
        path
    }

    pub fn value(&self, rel: &[&str]) -> Option<String> {
        self.tree.value(&self.path(rel)).map(str::to_string)
    }

    pub fn has(&self, rel: &[&str]) -> bool {
        self.tree.contains(&self.path(rel))
    }

    pub fn tree(&self) -> &'a ConfigTree {
        self.tree
    }
}

/// `permit` or `deny`.
pub fn is_action(s: &str) -> bool {
    matches!(s, "permit" | "deny")
}

/// Parse `s` as an integer and check it lies in `min..=max`.
pub fn in_range(s: &str, min: i64, max: i64) -> bool {
    s.parse::<i64>().map(|n| n >= min && n <= max).unwrap_or(false)
}
