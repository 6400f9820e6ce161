// src/validate/policy.rs

//! Routing-policy validators, one per subsystem.

use crate::policy::route_map::{ATTRIBUTES, open_rule};
use crate::policy::rules::{
    AccessList6Rule, AccessListRule, AddressFamily, Endpoint, PrefixRule, RegexRule,
    is_extended_access_list,
};
use crate::policy::{
    ACCESS_LIST, ACCESS_LIST6, AS_PATH_LIST, COMMUNITY_LIST, PREFIX_LIST, PREFIX_LIST6, ROUTE_MAP,
    RuleView, element_path, in_range, is_action, rules_path,
};
use crate::tree::{ConfigPath, ConfigTree};
use crate::validate::checks::{
    is_as_path_prepend, is_community, is_element_name, is_ipv4_address, is_ipv4_cidr,
    is_ipv6_address, is_ipv6_cidr, is_peer, is_shell_safe, is_signed_metric,
    is_standard_community,
};
use crate::validate::{Diagnostics, Validator};

/// Every shipped validator, in reporting order.
pub fn validators() -> Vec<Box<dyn Validator>> {
    vec![
        Box::new(AccessListValidator),
        Box::new(AccessList6Validator),
        Box::new(AsPathListValidator),
        Box::new(CommunityListValidator),
        Box::new(PrefixListValidator::new(AddressFamily::Ipv4)),
        Box::new(PrefixListValidator::new(AddressFamily::Ipv6)),
        Box::new(RouteMapValidator),
        Box::new(ScalarCardinality),
    ]
}

/// `<root> <element> [tail...]` as an owned path.
fn at(root: &[&str], element: &str, tail: &[&str]) -> ConfigPath {
    let mut path = element_path(root, element);
    path.extend(tail.iter().map(|s| s.to_string()));
    path
}

/// Every rule needs a permit/deny action.
fn check_rule_header(
    diag: &mut Diagnostics,
    root: &[&str],
    element: &str,
    rule: &str,
    action: Option<&str>,
) -> bool {
    if action.is_some_and(is_action) {
        return true;
    }
    let mut tail = vec!["rule", rule, "action"];
    tail.extend(action);
    diag.report(&at(root, element, &tail), "action must be permit or deny.");
    false
}

fn rule_in_range(diag: &mut Diagnostics, root: &[&str], element: &str, rule: &str) -> bool {
    if in_range(rule, 1, 65535) {
        return true;
    }
    diag.report(
        &at(root, element, &["rule", rule]),
        "rule number must be between 1 and 65535.",
    );
    false
}

/// Run `check` over every rule of every element under `root`.
fn for_each_rule<F>(candidate: &ConfigTree, root: &[&str], element: &str, mut check: F) -> bool
where
    F: FnMut(&str) -> bool,
{
    let mut valid = true;
    for rule in candidate.values(&rules_path(root, element)) {
        if !check(&rule) {
            valid = false;
        }
    }
    valid
}

pub struct AccessListValidator;

impl AccessListValidator {
    fn endpoint(
        diag: &mut Diagnostics,
        list: &str,
        rule: &str,
        side: &str,
        ep: &Endpoint,
    ) -> bool {
        let mut valid = true;
        let field = |tail: &[&str]| {
            let mut full = vec!["rule", rule, side];
            full.extend_from_slice(tail);
            at(ACCESS_LIST, list, &full)
        };
        for (name, value) in [
            ("host", &ep.host),
            ("inverse-mask", &ep.inverse_mask),
            ("network", &ep.network),
        ] {
            if let Some(v) = value {
                if !is_ipv4_address(v) {
                    diag.report(&field(&[name, v.as_str()]), format!("{side} {name} format error."));
                    valid = false;
                }
            }
        }
        if ep.network.is_some() && ep.inverse_mask.is_none() {
            diag.report(
                &field(&[]),
                "you must specify an inverse-mask if you configure a network.",
            );
            valid = false;
        }
        if ep.network.is_none() && ep.inverse_mask.is_some() {
            diag.report(
                &field(&[]),
                "you must specify a network if you configure an inverse mask.",
            );
            valid = false;
        }
        valid
    }

    fn rule(candidate: &ConfigTree, diag: &mut Diagnostics, list: &str, rule: &str) -> bool {
        if !rule_in_range(diag, ACCESS_LIST, list, rule) {
            return false;
        }
        let Some(r) = AccessListRule::read(candidate, list, rule) else {
            return false;
        };
        let mut valid = check_rule_header(diag, ACCESS_LIST, list, rule, r.action.as_deref());

        valid &= Self::endpoint(diag, list, rule, "source", &r.source);
        if r.source.match_count() != 1 {
            diag.report(
                &at(ACCESS_LIST, list, &["rule", rule, "source"]),
                "you may only define one filter type (host|network|any).",
            );
            valid = false;
        }

        valid &= Self::endpoint(diag, list, rule, "destination", &r.destination);
        let dst = r.destination.match_count();
        let extended = is_extended_access_list(list);
        let dst_path = at(ACCESS_LIST, list, &["rule", rule, "destination"]);
        if dst > 0 && !extended {
            diag.report(
                &dst_path,
                "access-list number must be <100-199> or <2000-2699> to set destination matches.",
            );
            valid = false;
        }
        if (dst == 0 && extended) || dst > 1 {
            diag.report(
                &dst_path,
                "you may only define one filter type (host|network|any).",
            );
            valid = false;
        }
        valid
    }
}

impl Validator for AccessListValidator {
    fn name(&self) -> &'static str {
        "access-list"
    }

    fn validate(&self, candidate: &ConfigTree, diag: &mut Diagnostics) -> bool {
        let mut valid = true;
        for list in candidate.values(ACCESS_LIST) {
            if !in_range(&list, 1, 199) && !in_range(&list, 1300, 2699) {
                diag.report(
                    &element_path(ACCESS_LIST, &list),
                    "access-list number must be <1-199> or <1300-2699>.",
                );
                valid = false;
                continue;
            }
            valid &= for_each_rule(candidate, ACCESS_LIST, &list, |rule| {
                Self::rule(candidate, diag, &list, rule)
            });
        }
        valid
    }
}

pub struct AccessList6Validator;

impl AccessList6Validator {
    fn name_ok(diag: &mut Diagnostics, list: &str) -> bool {
        let path = element_path(ACCESS_LIST6, list);
        let mut valid = true;
        if list.is_empty() || list.chars().count() > 64 {
            diag.report(&path, "access-list name must be 64 characters or less.");
            valid = false;
        }
        if list.starts_with('-') {
            diag.report(&path, "access-list name cannot start with \"-\".");
            valid = false;
        }
        if !is_shell_safe(list) {
            diag.report(&path, "access-list name cannot contain shell punctuation.");
            valid = false;
        }
        valid
    }

    fn rule(candidate: &ConfigTree, diag: &mut Diagnostics, list: &str, rule: &str) -> bool {
        if !rule_in_range(diag, ACCESS_LIST6, list, rule) {
            return false;
        }
        let Some(r) = AccessList6Rule::read(candidate, list, rule) else {
            return false;
        };
        let mut valid = check_rule_header(diag, ACCESS_LIST6, list, rule, r.action.as_deref());
        if let Some(network) = &r.source_network {
            if !is_ipv6_cidr(network) {
                diag.report(
                    &at(
                        ACCESS_LIST6,
                        list,
                        &["rule", rule, "source", "network", network.as_str()],
                    ),
                    "source network format error.",
                );
                valid = false;
            }
        }
        let matches = usize::from(r.source_any) + usize::from(r.source_network.is_some());
        if matches != 1 {
            diag.report(
                &at(ACCESS_LIST6, list, &["rule", rule, "source"]),
                "you may only define one filter type (network|any).",
            );
            valid = false;
        }
        valid
    }
}

impl Validator for AccessList6Validator {
    fn name(&self) -> &'static str {
        "access-list6"
    }

    fn validate(&self, candidate: &ConfigTree, diag: &mut Diagnostics) -> bool {
        let mut valid = true;
        for list in candidate.values(ACCESS_LIST6) {
            valid &= Self::name_ok(diag, &list);
            valid &= for_each_rule(candidate, ACCESS_LIST6, &list, |rule| {
                Self::rule(candidate, diag, &list, rule)
            });
        }
        valid
    }
}

/// Shared check for the regex-carrying lists.
fn regex_rule(
    diag: &mut Diagnostics,
    root: &[&str],
    list: &str,
    rule: &str,
    r: &RegexRule,
) -> bool {
    let mut valid = check_rule_header(diag, root, list, rule, r.action.as_deref());
    if r.regex.is_none() {
        diag.report(&at(root, list, &["rule", rule, "regex"]), "you must specify a regex.");
        valid = false;
    }
    valid
}

pub struct AsPathListValidator;

impl Validator for AsPathListValidator {
    fn name(&self) -> &'static str {
        "as-path-list"
    }

    fn validate(&self, candidate: &ConfigTree, diag: &mut Diagnostics) -> bool {
        let mut valid = true;
        for list in candidate.values(AS_PATH_LIST) {
            if !is_element_name(&list) {
                diag.report(
                    &element_path(AS_PATH_LIST, &list),
                    "as-path-list name must be alpha-numeric.",
                );
                valid = false;
            }
            valid &= for_each_rule(candidate, AS_PATH_LIST, &list, |rule| {
                if !rule_in_range(diag, AS_PATH_LIST, &list, rule) {
                    return false;
                }
                match RegexRule::read_as_path(candidate, &list, rule) {
                    Some(r) => regex_rule(diag, AS_PATH_LIST, &list, rule, &r),
                    None => false,
                }
            });
        }
        valid
    }
}

pub struct CommunityListValidator;

impl Validator for CommunityListValidator {
    fn name(&self) -> &'static str {
        "community-list"
    }

    fn validate(&self, candidate: &ConfigTree, diag: &mut Diagnostics) -> bool {
        let mut valid = true;
        for list in candidate.values(COMMUNITY_LIST) {
            if !in_range(&list, 1, 500) {
                diag.report(
                    &element_path(COMMUNITY_LIST, &list),
                    "community-list must be <1-99> (standard) or <100-500> (expanded).",
                );
                valid = false;
            }
            valid &= for_each_rule(candidate, COMMUNITY_LIST, &list, |rule| {
                if !rule_in_range(diag, COMMUNITY_LIST, &list, rule) {
                    return false;
                }
                let Some(r) = RegexRule::read_community(candidate, &list, rule) else {
                    return false;
                };
                let mut ok = regex_rule(diag, COMMUNITY_LIST, &list, rule, &r);
                if let Some(regex) = &r.regex {
                    if in_range(&list, 1, 99) && !is_standard_community(regex) {
                        diag.report(
                            &at(COMMUNITY_LIST, &list, &["rule", rule, "regex", regex.as_str()]),
                            format!("regex {regex} is invalid for a standard community list."),
                        );
                        ok = false;
                    }
                }
                ok
            });
        }
        valid
    }
}

pub struct PrefixListValidator {
    family: AddressFamily,
}

impl PrefixListValidator {
    pub fn new(family: AddressFamily) -> Self {
        Self { family }
    }

    fn rule(&self, candidate: &ConfigTree, diag: &mut Diagnostics, list: &str, rule: &str) -> bool {
        let root = self.family.prefix_list_root();
        if !rule_in_range(diag, root, list, rule) {
            return false;
        }
        let Some(r) = PrefixRule::read(candidate, self.family, list, rule) else {
            return false;
        };
        let mut valid = check_rule_header(diag, root, list, rule, r.action.as_deref());

        let max = self.family.max_prefix_len();
        for (name, bound) in [("le", &r.le), ("ge", &r.ge)] {
            if let Some(bound) = bound {
                if !in_range(bound, 0, max) {
                    diag.report(
                        &at(root, list, &["rule", rule, name, bound.as_str()]),
                        format!("{name} must be between 0 and {max}."),
                    );
                    valid = false;
                }
            }
        }

        let prefix_ok = r.prefix.as_deref().is_some_and(|p| match self.family {
            AddressFamily::Ipv4 => is_ipv4_cidr(p),
            AddressFamily::Ipv6 => is_ipv6_cidr(p),
        });
        if !prefix_ok {
            let mut tail = vec!["rule", rule, "prefix"];
            tail.extend(r.prefix.as_deref());
            diag.report(&at(root, list, &tail), "you must specify a prefix.");
            valid = false;
        }
        valid
    }
}

impl Validator for PrefixListValidator {
    fn name(&self) -> &'static str {
        match self.family {
            AddressFamily::Ipv4 => "prefix-list",
            AddressFamily::Ipv6 => "prefix-list6",
        }
    }

    fn validate(&self, candidate: &ConfigTree, diag: &mut Diagnostics) -> bool {
        let root = self.family.prefix_list_root();
        let mut valid = true;
        for list in candidate.values(root) {
            if !is_element_name(&list) {
                diag.report(
                    &element_path(root, &list),
                    format!("{} name must be alpha-numeric.", self.name()),
                );
                valid = false;
            }
            valid &= for_each_rule(candidate, root, &list, |rule| {
                self.rule(candidate, diag, &list, rule)
            });
        }
        valid
    }
}

pub struct RouteMapValidator;

/// A route-map reference to another policy element.
struct Reference {
    rel: &'static [&'static str],
    target: &'static [&'static str],
    label: &'static str,
}

const REFERENCES: &[Reference] = &[
    Reference { rel: &["call"], target: ROUTE_MAP, label: "called route-map" },
    Reference { rel: &["match", "as-path"], target: AS_PATH_LIST, label: "as-path-list" },
    Reference {
        rel: &["match", "community", "community-list"],
        target: COMMUNITY_LIST,
        label: "community-list",
    },
    Reference {
        rel: &["set", "comm-list", "comm-list"],
        target: COMMUNITY_LIST,
        label: "community-list",
    },
];

/// `match <family> <kind> access-list|prefix-list` pairs: both must exist and
/// at most one may be set.
const EXCLUSIVE_MATCHES: &[(&str, &str, AddressFamily)] = &[
    ("ip", "address", AddressFamily::Ipv4),
    ("ip", "nexthop", AddressFamily::Ipv4),
    ("ip", "route-source", AddressFamily::Ipv4),
    ("ipv6", "address", AddressFamily::Ipv6),
    ("ipv6", "nexthop", AddressFamily::Ipv6),
];

impl RouteMapValidator {
    fn rule(candidate: &ConfigTree, diag: &mut Diagnostics, name: &str, rule: &str) -> bool {
        if !rule_in_range(diag, ROUTE_MAP, name, rule) {
            return false;
        }
        let Some(view) = open_rule(candidate, name, rule) else {
            return false;
        };
        let action = view.value(&["action"]);
        let mut valid = check_rule_header(diag, ROUTE_MAP, name, rule, action.as_deref());
        let report_at = |diag: &mut Diagnostics, tail: &[&str], message: String| {
            let mut full = vec!["rule", rule];
            full.extend_from_slice(tail);
            diag.report(&at(ROUTE_MAP, name, &full), message);
        };

        for reference in REFERENCES {
            if let Some(target) = view.value(reference.rel) {
                if !candidate.contains(&element_path(reference.target, &target)) {
                    let mut tail: Vec<&str> = reference.rel.to_vec();
                    tail.push(&target);
                    report_at(diag, &tail, format!("{} {target} does not exist.", reference.label));
                    valid = false;
                }
            }
        }

        for &(family_kw, kind, family) in EXCLUSIVE_MATCHES {
            let acl = view.value(&["match", family_kw, kind, "access-list"]);
            let pfx = view.value(&["match", family_kw, kind, "prefix-list"]);
            for (kw, value, root) in [
                ("access-list", &acl, family.access_list_root()),
                ("prefix-list", &pfx, family.prefix_list_root()),
            ] {
                if let Some(value) = value {
                    if !candidate.contains(&element_path(root, value)) {
                        report_at(
                            diag,
                            &["match", family_kw, kind, kw, value.as_str()],
                            format!("{} {value} does not exist.", root[1]),
                        );
                        valid = false;
                    }
                }
            }
            if acl.is_some() && pfx.is_some() {
                report_at(
                    diag,
                    &["match", family_kw, kind],
                    "you may only specify a prefix-list or access-list.".to_string(),
                );
                valid = false;
            }
        }

        valid &= Self::forward_jumps(diag, &view, rule, &report_at);
        valid &= Self::scalar_formats(diag, &view, &report_at);
        valid
    }

    fn forward_jumps(
        diag: &mut Diagnostics,
        view: &RuleView<'_>,
        rule: &str,
        report_at: &dyn Fn(&mut Diagnostics, &[&str], String),
    ) -> bool {
        let mut valid = true;
        let from: i64 = rule.parse().unwrap_or_default();
        for (rel, what) in [
            (&["continue"][..], "continue"),
            (&["on-match", "goto"][..], "goto"),
        ] {
            let Some(to) = view.value(rel) else { continue };
            let mut tail: Vec<&str> = rel.to_vec();
            tail.push(&to);
            if !in_range(&to, 1, 65535) {
                report_at(diag, &tail, format!("{what} must be between 1 and 65535."));
                valid = false;
            }
            if to.parse::<i64>().unwrap_or_default() <= from {
                report_at(diag, &tail, "you may only go forward in the route-map.".to_string());
                valid = false;
            }
        }
        if view.has(&["on-match", "goto"]) && view.has(&["on-match", "next"]) {
            report_at(diag, &["on-match"], "you may set only goto or next.".to_string());
            valid = false;
        }
        valid
    }

    fn scalar_formats(
        diag: &mut Diagnostics,
        view: &RuleView<'_>,
        report_at: &dyn Fn(&mut Diagnostics, &[&str], String),
    ) -> bool {
        type Check = fn(&str) -> bool;
        let checks: &[(&[&str], Check, &str)] = &[
            (&["match", "metric"], |s| in_range(s, 1, 65535), "metric must be between 1 and 65535."),
            (
                &["match", "origin"],
                |s| matches!(s, "egp" | "igp" | "incomplete"),
                "origin must be egp, igp, or incomplete.",
            ),
            (&["match", "peer"], is_peer, "peer must be either an IP or local."),
            (&["match", "tag"], |s| in_range(s, 1, 65535), "tag must be between 1 and 65535."),
            (
                &["set", "aggregator", "as"],
                |s| in_range(s, 1, 4_294_967_294),
                "BGP AS number must be between 1 and 4294967294.",
            ),
            (&["set", "aggregator", "ip"], is_ipv4_address, "aggregator IP format error."),
            (&["set", "as-path-prepend"], is_as_path_prepend, "invalid AS path string."),
            (&["set", "community"], is_community, "community format error."),
            (&["set", "ip-next-hop"], is_ipv4_address, "ip-next-hop format error."),
            (
                &["set", "ipv6-next-hop", "global"],
                is_ipv6_address,
                "ipv6-next-hop global format error.",
            ),
            (
                &["set", "ipv6-next-hop", "local"],
                is_ipv6_address,
                "ipv6-next-hop local format error.",
            ),
            (
                &["set", "local-preference"],
                |s| in_range(s, 0, 4_294_967_295),
                "local-preference format error.",
            ),
            (
                &["set", "metric-type"],
                |s| matches!(s, "type-1" | "type-2"),
                "metric-type must be type-1 or type-2.",
            ),
            (
                &["set", "metric"],
                is_signed_metric,
                "metric must be an integer with an optional +/- prepend.",
            ),
            (
                &["set", "origin"],
                |s| matches!(s, "igp" | "egp" | "incomplete"),
                "origin must be one of igp, egp, or incomplete.",
            ),
            (&["set", "originator-id"], is_ipv4_address, "originator-id format error."),
            (&["set", "tag"], |s| in_range(s, 1, 65535), "tag must be between 1 and 65535."),
            (&["set", "weight"], |s| in_range(s, 0, 4_294_967_295), "weight format error."),
        ];

        let mut valid = true;
        for (rel, check, message) in checks {
            if let Some(value) = view.value(rel) {
                if !check(&value) {
                    let mut tail: Vec<&str> = rel.to_vec();
                    tail.push(&value);
                    report_at(diag, &tail, message.to_string());
                    valid = false;
                }
            }
        }

        let has_as = view.has(&["set", "aggregator", "as"]);
        let has_ip = view.has(&["set", "aggregator", "ip"]);
        if has_as != has_ip {
            report_at(
                diag,
                &["set", "aggregator"],
                "you must configure both as and ip.".to_string(),
            );
            valid = false;
        }
        valid
    }
}

impl Validator for RouteMapValidator {
    fn name(&self) -> &'static str {
        "route-map"
    }

    fn validate(&self, candidate: &ConfigTree, diag: &mut Diagnostics) -> bool {
        let mut valid = true;
        for name in candidate.values(ROUTE_MAP) {
            if !is_element_name(&name) {
                diag.report(
                    &element_path(ROUTE_MAP, &name),
                    "route-map name must be alpha-numeric.",
                );
                valid = false;
            }
            valid &= for_each_rule(candidate, ROUTE_MAP, &name, |rule| {
                Self::rule(candidate, diag, &name, rule)
            });
        }
        valid
    }
}

/// Fails any policy leaf that should hold one value but holds several.
pub struct ScalarCardinality;

impl ScalarCardinality {
    fn scalar_paths(root: &[&str]) -> Vec<&'static [&'static str]> {
        if root == ROUTE_MAP {
            let mut paths: Vec<&'static [&'static str]> = vec![&["action"]];
            paths.extend(ATTRIBUTES.iter().flat_map(|a| a.scalar_paths()));
            return paths;
        }
        let table = if root == ACCESS_LIST {
            AccessListRule::SCALARS
        } else if root == ACCESS_LIST6 {
            AccessList6Rule::SCALARS
        } else if root == PREFIX_LIST || root == PREFIX_LIST6 {
            PrefixRule::SCALARS
        } else {
            RegexRule::SCALARS
        };
        table.to_vec()
    }
}

impl Validator for ScalarCardinality {
    fn name(&self) -> &'static str {
        "cardinality"
    }

    fn validate(&self, candidate: &ConfigTree, diag: &mut Diagnostics) -> bool {
        let mut valid = true;
        for root in [
            ACCESS_LIST,
            ACCESS_LIST6,
            AS_PATH_LIST,
            COMMUNITY_LIST,
            PREFIX_LIST,
            PREFIX_LIST6,
            ROUTE_MAP,
        ] {
            let scalars = Self::scalar_paths(root);
            for element in candidate.values(root) {
                for rule in candidate.values(&rules_path(root, &element)) {
                    let Some(view) = RuleView::open(candidate, root, &element, &rule) else {
                        continue;
                    };
                    for rel in &scalars {
                        let path = view.path(rel);
                        if let Err(err) = candidate.try_value(&path) {
                            diag.report(&path, format!("{err}; only one value may be set."));
                            valid = false;
                        }
                    }
                }
            }
        }
        valid
    }
}
