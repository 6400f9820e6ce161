// src/commit/route_map.rs

//! Route-map commit generator.
//!
//! Unlike lists, a route-map entry can be edited in place, so changed rules
//! are patched attribute by attribute instead of being rebuilt.

use tracing::debug;

use crate::commit::CommitGenerator;
use crate::exec::CommandBatch;
use crate::policy::route_map::{ATTRIBUTES, RouteMapAttr, open_rule};
use crate::policy::{ROUTE_MAP, RuleView, element_path, is_action, rules_path, sorted_rules};
use crate::tree::ConfigTree;

#[derive(Debug, Default)]
pub struct RouteMapGenerator;

impl RouteMapGenerator {
    pub fn new() -> Self {
        Self
    }

    fn patch_route_map(
        &self,
        candidate: &ConfigTree,
        running: &ConfigTree,
        name: &str,
    ) -> Vec<CommandBatch> {
        let mut batches = Vec::new();

        for rule in running.values(&rules_path(ROUTE_MAP, name)) {
            if open_rule(candidate, name, &rule).is_some() {
                continue;
            }
            let Some(action) = open_rule(running, name, &rule).and_then(|r| r.value(&["action"]))
            else {
                continue;
            };
            batches.push(CommandBatch::configure([format!(
                "no route-map {name} {action} {rule}"
            )]));
        }

        for rule in sorted_rules(candidate, ROUTE_MAP, name) {
            let mut path = rules_path(ROUTE_MAP, name);
            path.push(rule.clone());
            if !candidate.differs_at(running, &path) {
                continue;
            }
            let Some(cand) = open_rule(candidate, name, &rule) else {
                continue;
            };
            let Some(action) = cand.value(&["action"]).filter(|a| is_action(a)) else {
                debug!(route_map = name, rule, "skipping rule without a valid action");
                continue;
            };
            let run = open_rule(running, name, &rule);
            batches.extend(patch_rule(name, &rule, &action, &cand, run.as_ref()));
        }

        batches
    }
}

impl CommitGenerator for RouteMapGenerator {
    fn name(&self) -> &'static str {
        "route-map"
    }

    fn root(&self) -> &'static [&'static str] {
        ROUTE_MAP
    }

    fn generate(&self, candidate: &ConfigTree, running: &ConfigTree) -> Vec<CommandBatch> {
        let mut batches = Vec::new();

        for name in running.values(ROUTE_MAP) {
            if !candidate.contains(&element_path(ROUTE_MAP, &name)) {
                batches.push(CommandBatch::configure([format!("no route-map {name}")]));
            }
        }

        for name in candidate.values(ROUTE_MAP) {
            if candidate.differs_at(running, &element_path(ROUTE_MAP, &name)) {
                batches.extend(self.patch_route_map(candidate, running, &name));
            }
        }

        batches
    }
}

/// Enter the entry, then emit only the attributes that changed.
fn patch_rule(
    name: &str,
    rule: &str,
    action: &str,
    cand: &RuleView<'_>,
    run: Option<&RuleView<'_>>,
) -> Vec<CommandBatch> {
    let entry = format!("route-map {name} {action} {rule}");
    let action_changed = run
        .and_then(|r| r.value(&["action"]))
        .is_some_and(|old| old != action);

    let mut batches = vec![CommandBatch::configure([entry.clone()])];
    for attr in ATTRIBUTES {
        for line in attribute_lines(attr, cand, run, action_changed) {
            batches.push(CommandBatch::configure([entry.clone(), line]));
        }
    }
    batches
}

/// Commands that move one attribute from its running value to its candidate
/// value; empty when nothing changed.
pub fn attribute_lines(
    attr: &RouteMapAttr,
    cand: &RuleView<'_>,
    run: Option<&RuleView<'_>>,
    action_changed: bool,
) -> Vec<String> {
    let new = attr.render(cand);
    let old = run.and_then(|r| attr.render(r));

    if !action_changed && run.is_some() && new == old {
        return Vec::new();
    }

    let mut lines = Vec::new();
    if old.is_some() && (new.is_none() || attr.clears_first()) {
        lines.push(attr.remove.to_string());
    }
    if let Some(value) = new {
        lines.push(attr.set_command(&value));
    }
    lines
}
