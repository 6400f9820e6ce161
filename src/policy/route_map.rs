// src/policy/route_map.rs

//! Route-map rule attributes.
//!
//! Every attribute a route-map rule can carry is one row of [`ATTRIBUTES`]:
//! where it lives below `policy route-map <name> rule <n>`, how its value is
//! rendered into a native command, and whether changing it requires
//! clearing the old value first.

use crate::policy::{ROUTE_MAP, RuleView};
use crate::tree::ConfigTree;

/// Shape of an attribute's configuration below the rule node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrShape {
    /// A single value at `path`.
    Scalar(&'static [&'static str]),
    /// Presence of `path` is the whole attribute.
    Flag(&'static [&'static str]),
    /// A value plus an optional trailing keyword present as a sibling flag.
    Qualified {
        value: &'static [&'static str],
        flag: &'static [&'static str],
        word: &'static str,
    },
    /// Two values that are only meaningful together.
    Pair {
        first: &'static [&'static str],
        second: &'static [&'static str],
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMapAttr {
    /// Native keyword, e.g. `match ip address prefix-list`.
    pub keyword: &'static str,
    /// Native removal command.
    pub remove: &'static str,
    pub shape: AttrShape,
}

impl RouteMapAttr {
    /// Rendered value of the attribute on one rule, `Some("")` for a set flag.
    pub fn render(&self, view: &RuleView<'_>) -> Option<String> {
        match self.shape {
            AttrShape::Scalar(path) => view.value(path),
            AttrShape::Flag(path) => view.has(path).then(String::new),
            AttrShape::Qualified { value, flag, word } => {
                let value = view.value(value)?;
                if view.has(flag) {
                    Some(format!("{value} {word}"))
                } else {
                    Some(value)
                }
            }
            AttrShape::Pair { first, second } => {
                let first = view.value(first)?;
                let second = view.value(second)?;
                Some(format!("{first} {second}"))
            }
        }
    }

    /// Command that installs `value`.
    pub fn set_command(&self, value: &str) -> String {
        if value.is_empty() {
            self.keyword.to_string()
        } else {
            format!("{} {value}", self.keyword)
        }
    }

    /// Qualified and paired attributes are replaced by removing the old value
    /// before installing the new one.
    pub fn clears_first(&self) -> bool {
        matches!(
            self.shape,
            AttrShape::Qualified { .. } | AttrShape::Pair { .. }
        )
    }

    /// Leaves that must hold at most one value.
    pub fn scalar_paths(&self) -> Vec<&'static [&'static str]> {
        match self.shape {
            AttrShape::Scalar(path) => vec![path],
            AttrShape::Flag(_) => Vec::new(),
            AttrShape::Qualified { value, .. } => vec![value],
            AttrShape::Pair { first, second } => vec![first, second],
        }
    }
}

const fn scalar(
    keyword: &'static str,
    remove: &'static str,
    path: &'static [&'static str],
) -> RouteMapAttr {
    RouteMapAttr {
        keyword,
        remove,
        shape: AttrShape::Scalar(path),
    }
}

const fn flag(
    keyword: &'static str,
    remove: &'static str,
    path: &'static [&'static str],
) -> RouteMapAttr {
    RouteMapAttr {
        keyword,
        remove,
        shape: AttrShape::Flag(path),
    }
}

/// Attribute table, in emission order.
pub const ATTRIBUTES: &[RouteMapAttr] = &[
    scalar("call", "no call", &["call"]),
    scalar("continue", "no continue", &["continue"]),
    scalar("match as-path", "no match as-path", &["match", "as-path"]),
    RouteMapAttr {
        keyword: "match community",
        remove: "no match community",
        shape: AttrShape::Qualified {
            value: &["match", "community", "community-list"],
            flag: &["match", "community", "exact-match"],
            word: "exact-match",
        },
    },
    scalar("match interface", "no match interface", &["match", "interface"]),
    scalar(
        "match ip address",
        "no match ip address",
        &["match", "ip", "address", "access-list"],
    ),
    scalar(
        "match ip address prefix-list",
        "no match ip address prefix-list",
        &["match", "ip", "address", "prefix-list"],
    ),
    scalar(
        "match ip next-hop",
        "no match ip next-hop",
        &["match", "ip", "nexthop", "access-list"],
    ),
    scalar(
        "match ip next-hop prefix-list",
        "no match ip next-hop prefix-list",
        &["match", "ip", "nexthop", "prefix-list"],
    ),
    scalar(
        "match ip route-source",
        "no match ip route-source",
        &["match", "ip", "route-source", "access-list"],
    ),
    scalar(
        "match ip route-source prefix-list",
        "no match ip route-source prefix-list",
        &["match", "ip", "route-source", "prefix-list"],
    ),
    scalar(
        "match ipv6 address",
        "no match ipv6 address",
        &["match", "ipv6", "address", "access-list"],
    ),
    scalar(
        "match ipv6 address prefix-list",
        "no match ipv6 address prefix-list",
        &["match", "ipv6", "address", "prefix-list"],
    ),
    scalar(
        "match ipv6 next-hop",
        "no match ipv6 next-hop",
        &["match", "ipv6", "nexthop", "access-list"],
    ),
    scalar(
        "match ipv6 next-hop prefix-list",
        "no match ipv6 next-hop prefix-list",
        &["match", "ipv6", "nexthop", "prefix-list"],
    ),
    scalar("match metric", "no match metric", &["match", "metric"]),
    scalar("match origin", "no match origin", &["match", "origin"]),
    scalar("match peer", "no match peer", &["match", "peer"]),
    scalar("match tag", "no match tag", &["match", "tag"]),
    scalar("on-match goto", "no on-match goto", &["on-match", "goto"]),
    flag("on-match next", "no on-match next", &["on-match", "next"]),
    RouteMapAttr {
        keyword: "set aggregator as",
        remove: "no set aggregator as",
        shape: AttrShape::Pair {
            first: &["set", "aggregator", "as"],
            second: &["set", "aggregator", "ip"],
        },
    },
    scalar(
        "set as-path prepend",
        "no set as-path prepend",
        &["set", "as-path-prepend"],
    ),
    flag(
        "set atomic-aggregate",
        "no set atomic-aggregate",
        &["set", "atomic-aggregate"],
    ),
    RouteMapAttr {
        keyword: "set comm-list",
        remove: "no set comm-list",
        shape: AttrShape::Qualified {
            value: &["set", "comm-list", "comm-list"],
            flag: &["set", "comm-list", "delete"],
            word: "delete",
        },
    },
    scalar("set community", "no set community", &["set", "community"]),
    scalar("set ip next-hop", "no set ip next-hop", &["set", "ip-next-hop"]),
    scalar(
        "set ipv6 next-hop global",
        "no set ipv6 next-hop global",
        &["set", "ipv6-next-hop", "global"],
    ),
    scalar(
        "set ipv6 next-hop local",
        "no set ipv6 next-hop local",
        &["set", "ipv6-next-hop", "local"],
    ),
    scalar(
        "set local-preference",
        "no set local-preference",
        &["set", "local-preference"],
    ),
    scalar("set metric-type", "no set metric-type", &["set", "metric-type"]),
    scalar("set metric", "no set metric", &["set", "metric"]),
    scalar("set origin", "no set origin", &["set", "origin"]),
    scalar(
        "set originator-id",
        "no set originator-id",
        &["set", "originator-id"],
    ),
    scalar("set tag", "no set tag", &["set", "tag"]),
    scalar("set weight", "no set weight", &["set", "weight"]),
];

/// Look up an attribute row by its native keyword.
pub fn attribute(keyword: &str) -> Option<&'static RouteMapAttr> {
    ATTRIBUTES.iter().find(|a| a.keyword == keyword)
}

/// Cursor on `policy route-map <name> rule <rule>`.
pub fn open_rule<'a>(tree: &'a ConfigTree, name: &str, rule: &str) -> Option<RuleView<'a>> {
    RuleView::open(tree, ROUTE_MAP, name, rule)
}
