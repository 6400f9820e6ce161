// src/policy/rules.rs

//! Typed readers for list rules.
//!
//! Each reader returns `None` when the rule node does not exist; fields that
//! are absent (or over-populated, see [`ConfigTree::value`]) read as `None`.

use crate::policy::{
    ACCESS_LIST, ACCESS_LIST6, AS_PATH_LIST, COMMUNITY_LIST, PREFIX_LIST, PREFIX_LIST6, RuleView,
};
use crate::tree::ConfigTree;

/// Source or destination match of an IPv4 access-list rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoint {
    pub any: bool,
    pub host: Option<String>,
    pub inverse_mask: Option<String>,
    pub network: Option<String>,
}

impl Endpoint {
    fn read(view: &RuleView<'_>, side: &str) -> Self {
        Self {
            any: view.has(&[side, "any"]),
            host: view.value(&[side, "host"]),
            inverse_mask: view.value(&[side, "inverse-mask"]),
            network: view.value(&[side, "network"]),
        }
    }

    /// How many of any/host/network are configured.
    pub fn match_count(&self) -> usize {
        usize::from(self.any) + usize::from(self.host.is_some()) + usize::from(self.network.is_some())
    }

    /// Native rendering: ` any`, ` host A`, ` NET MASK`, or empty.
    pub fn render(&self) -> String {
        if self.any {
            " any".to_string()
        } else if let Some(host) = &self.host {
            format!(" host {host}")
        } else if let (Some(net), Some(mask)) = (&self.network, &self.inverse_mask) {
            format!(" {net} {mask}")
        } else {
            String::new()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessListRule {
    pub action: Option<String>,
    pub source: Endpoint,
    pub destination: Endpoint,
}

impl AccessListRule {
    pub const SCALARS: &'static [&'static [&'static str]] = &[
        &["action"],
        &["source", "host"],
        &["source", "inverse-mask"],
        &["source", "network"],
        &["destination", "host"],
        &["destination", "inverse-mask"],
        &["destination", "network"],
    ];

    pub fn read(tree: &ConfigTree, list: &str, rule: &str) -> Option<Self> {
        let view = RuleView::open(tree, ACCESS_LIST, list, rule)?;
        Some(Self {
            action: view.value(&["action"]),
            source: Endpoint::read(&view, "source"),
            destination: Endpoint::read(&view, "destination"),
        })
    }
}

/// Extended access lists (100-199, 2000-2699) also match on destination.
pub fn is_extended_access_list(list: &str) -> bool {
    crate::policy::in_range(list, 100, 199) || crate::policy::in_range(list, 2000, 2699)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessList6Rule {
    pub action: Option<String>,
    pub source_any: bool,
    pub source_exact_match: bool,
    pub source_network: Option<String>,
}

impl AccessList6Rule {
    pub const SCALARS: &'static [&'static [&'static str]] =
        &[&["action"], &["source", "network"]];

    pub fn read(tree: &ConfigTree, list: &str, rule: &str) -> Option<Self> {
        let view = RuleView::open(tree, ACCESS_LIST6, list, rule)?;
        Some(Self {
            action: view.value(&["action"]),
            source_any: view.has(&["source", "any"]),
            source_exact_match: view.has(&["source", "exact-match"]),
            source_network: view.value(&["source", "network"]),
        })
    }
}

/// `action` + `regex` rule shared by as-path lists and community lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexRule {
    pub action: Option<String>,
    pub regex: Option<String>,
}

impl RegexRule {
    pub const SCALARS: &'static [&'static [&'static str]] = &[&["action"], &["regex"]];

    pub fn read_as_path(tree: &ConfigTree, list: &str, rule: &str) -> Option<Self> {
        Self::read(RuleView::open(tree, AS_PATH_LIST, list, rule)?)
    }

    pub fn read_community(tree: &ConfigTree, list: &str, rule: &str) -> Option<Self> {
        Self::read(RuleView::open(tree, COMMUNITY_LIST, list, rule)?)
    }

    fn read(view: RuleView<'_>) -> Option<Self> {
        Some(Self {
            action: view.value(&["action"]),
            regex: view.value(&["regex"]),
        })
    }
}

/// Prefix-list rule (IPv4 or IPv6; the family decides which root is read).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixRule {
    pub action: Option<String>,
    pub ge: Option<String>,
    pub le: Option<String>,
    pub prefix: Option<String>,
}

impl PrefixRule {
    pub const SCALARS: &'static [&'static [&'static str]] =
        &[&["action"], &["ge"], &["le"], &["prefix"]];

    pub fn read(tree: &ConfigTree, family: AddressFamily, list: &str, rule: &str) -> Option<Self> {
        let view = RuleView::open(tree, family.prefix_list_root(), list, rule)?;
        Some(Self {
            action: view.value(&["action"]),
            ge: view.value(&["ge"]),
            le: view.value(&["le"]),
            prefix: view.value(&["prefix"]),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

impl AddressFamily {
    pub fn prefix_list_root(self) -> &'static [&'static str] {
        match self {
            AddressFamily::Ipv4 => PREFIX_LIST,
            AddressFamily::Ipv6 => PREFIX_LIST6,
        }
    }

    pub fn access_list_root(self) -> &'static [&'static str] {
        match self {
            AddressFamily::Ipv4 => ACCESS_LIST,
            AddressFamily::Ipv6 => ACCESS_LIST6,
        }
    }

    /// Longest prefix length of the family.
    pub fn max_prefix_len(self) -> i64 {
        match self {
            AddressFamily::Ipv4 => 32,
            AddressFamily::Ipv6 => 128,
        }
    }
}
