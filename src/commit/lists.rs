// src/commit/lists.rs

//! List-shaped subsystems.
//!
//! Access lists, as-path lists, community lists and prefix lists all share
//! one shape: `<root> <name> rule <n> ...`. The daemon cannot edit a single
//! rule of such a list in place, so a changed list is removed as a whole
//! and its rules are re-added in rule order.

use tracing::debug;

use crate::commit::CommitGenerator;
use crate::exec::CommandBatch;
use crate::policy::rules::{
    AccessList6Rule, AccessListRule, AddressFamily, PrefixRule, RegexRule,
    is_extended_access_list,
};
use crate::policy::{
    ACCESS_LIST, ACCESS_LIST6, AS_PATH_LIST, COMMUNITY_LIST, PREFIX_LIST, PREFIX_LIST6,
    element_path, in_range, is_action, sorted_rules,
};
use crate::tree::ConfigTree;
use crate::validate::checks::{is_ipv4_cidr, is_ipv6_cidr};

/// Renders the removal command for a whole list.
type RemoveFn = fn(&str) -> String;
/// Renders one rule of a list, `None` when the rule is incomplete.
type RuleFn = fn(&ConfigTree, &str, &str) -> Option<String>;

/// Generator for one list-shaped subsystem.
pub struct ListGenerator {
    name: &'static str,
    root: &'static [&'static str],
    remove: RemoveFn,
    rule: RuleFn,
}

impl ListGenerator {
    pub fn access_list() -> Self {
        Self {
            name: "access-list",
            root: ACCESS_LIST,
            remove: |list| format!("no access-list {list}"),
            rule: access_list_rule,
        }
    }

    pub fn access_list6() -> Self {
        Self {
            name: "access-list6",
            root: ACCESS_LIST6,
            remove: |list| format!("no ipv6 access-list {list}"),
            rule: access_list6_rule,
        }
    }

    pub fn as_path_list() -> Self {
        Self {
            name: "as-path-list",
            root: AS_PATH_LIST,
            remove: |list| format!("no ip as-path access-list {list}"),
            rule: as_path_rule,
        }
    }

    pub fn community_list() -> Self {
        Self {
            name: "community-list",
            root: COMMUNITY_LIST,
            remove: |list| format!("no ip community-list {list}"),
            rule: community_rule,
        }
    }

    pub fn prefix_list() -> Self {
        Self {
            name: "prefix-list",
            root: PREFIX_LIST,
            remove: |list| format!("no ip prefix-list {list}"),
            rule: |tree, list, rule| prefix_rule(tree, AddressFamily::Ipv4, list, rule),
        }
    }

    pub fn prefix_list6() -> Self {
        Self {
            name: "prefix-list6",
            root: PREFIX_LIST6,
            remove: |list| format!("no ipv6 prefix-list {list}"),
            rule: |tree, list, rule| prefix_rule(tree, AddressFamily::Ipv6, list, rule),
        }
    }

    /// Remove-then-rebuild batches for one list present in `candidate`.
    fn rebuild(&self, candidate: &ConfigTree, list: &str) -> Vec<CommandBatch> {
        let mut batches = vec![CommandBatch::configure([(self.remove)(list)])];
        for rule in sorted_rules(candidate, self.root, list) {
            match (self.rule)(candidate, list, &rule) {
                Some(line) => batches.push(CommandBatch::configure([line])),
                None => debug!(subsystem = self.name, list, rule, "skipping incomplete rule"),
            }
        }
        batches
    }
}

impl CommitGenerator for ListGenerator {
    fn name(&self) -> &'static str {
        self.name
    }

    fn root(&self) -> &'static [&'static str] {
        self.root
    }

    fn generate(&self, candidate: &ConfigTree, running: &ConfigTree) -> Vec<CommandBatch> {
        let mut batches = Vec::new();

        for list in running.values(self.root) {
            if !candidate.contains(&element_path(self.root, &list)) {
                batches.push(CommandBatch::configure([(self.remove)(&list)]));
            }
        }

        for list in candidate.values(self.root) {
            if candidate.differs_at(running, &element_path(self.root, &list)) {
                batches.extend(self.rebuild(candidate, &list));
            }
        }

        batches
    }
}

fn valid_action(action: Option<String>) -> Option<String> {
    action.filter(|a| is_action(a))
}

fn access_list_rule(tree: &ConfigTree, list: &str, rule: &str) -> Option<String> {
    let r = AccessListRule::read(tree, list, rule)?;
    let action = valid_action(r.action)?;
    let source = r.source.render();
    if source.is_empty() {
        return None;
    }
    if is_extended_access_list(list) {
        let destination = r.destination.render();
        if destination.is_empty() {
            return None;
        }
        Some(format!("access-list {list} {action} ip{source}{destination}"))
    } else {
        Some(format!("access-list {list} {action}{source}"))
    }
}

fn access_list6_rule(tree: &ConfigTree, list: &str, rule: &str) -> Option<String> {
    let r = AccessList6Rule::read(tree, list, rule)?;
    let action = valid_action(r.action)?;
    let source = if r.source_any {
        "any".to_string()
    } else {
        let network = r.source_network?;
        if r.source_exact_match {
            format!("{network} exact-match")
        } else {
            network
        }
    };
    Some(format!("ipv6 access-list {list} {action} {source}"))
}

fn as_path_rule(tree: &ConfigTree, list: &str, rule: &str) -> Option<String> {
    let r = RegexRule::read_as_path(tree, list, rule)?;
    let action = valid_action(r.action)?;
    let regex = r.regex?;
    Some(format!("ip as-path access-list {list} {action} {regex}"))
}

fn community_rule(tree: &ConfigTree, list: &str, rule: &str) -> Option<String> {
    let r = RegexRule::read_community(tree, list, rule)?;
    let action = valid_action(r.action)?;
    let regex = r.regex?;
    Some(format!("ip community-list {list} {action} {regex}"))
}

fn prefix_rule(tree: &ConfigTree, family: AddressFamily, list: &str, rule: &str) -> Option<String> {
    let r = PrefixRule::read(tree, family, list, rule)?;
    let action = valid_action(r.action)?;
    let prefix = r.prefix.filter(|p| match family {
        AddressFamily::Ipv4 => is_ipv4_cidr(p),
        AddressFamily::Ipv6 => is_ipv6_cidr(p),
    })?;

    let max = family.max_prefix_len();
    let mut line = match family {
        AddressFamily::Ipv4 => format!("ip prefix-list {list} seq {rule} {action} {prefix}"),
        AddressFamily::Ipv6 => format!("ipv6 prefix-list {list} seq {rule} {action} {prefix}"),
    };
    for (keyword, bound) in [("ge", r.ge), ("le", r.le)] {
        if let Some(bound) = bound {
            if !in_range(&bound, 0, max) {
                return None;
            }
            line.push_str(&format!(" {keyword} {bound}"));
        }
    }
    Some(line)
}
