use confsync::commit::route_map::attribute_lines;
use confsync::commit::{CommitGenerator, RouteMapGenerator};
use confsync::exec::CommandBatch;
use confsync::policy::route_map::{attribute, open_rule};
use confsync::tree::ConfigTree;
use confsync_test_utils::builders::tree;

/// Everything after `configure terminal`, joined per batch.
fn rendered(batches: &[CommandBatch]) -> Vec<String> {
    batches
        .iter()
        .map(|b| b.lines()[1..].join(" | "))
        .collect()
}

const BASE: &[&str] = &[
    "policy route-map RM1 rule 10 action permit",
    "policy route-map RM1 rule 10 match ip address prefix-list PL1",
    "policy route-map RM1 rule 10 set metric 100",
];

#[test]
fn test_new_route_map_sets_every_attribute() {
    let candidate = tree(BASE);

    let batches = RouteMapGenerator::new().generate(&candidate, &ConfigTree::new());

    assert_eq!(
        rendered(&batches),
        vec![
            "route-map RM1 permit 10",
            "route-map RM1 permit 10 | match ip address prefix-list PL1",
            "route-map RM1 permit 10 | set metric 100",
        ]
    );
}

#[test]
fn test_changed_attribute_only() {
    let running = tree(BASE);
    let mut candidate = running.clone();
    candidate.delete(&["policy", "route-map", "RM1", "rule", "10", "set", "metric", "100"]);
    candidate.set(&["policy", "route-map", "RM1", "rule", "10", "set", "metric", "200"]);

    let batches = RouteMapGenerator::new().generate(&candidate, &running);

    assert_eq!(
        rendered(&batches),
        vec!["route-map RM1 permit 10", "route-map RM1 permit 10 | set metric 200"]
    );
}

#[test]
fn test_removed_attribute_is_negated() {
    let running = tree(BASE);
    let mut candidate = running.clone();
    candidate.delete(&["policy", "route-map", "RM1", "rule", "10", "set"]);

    let batches = RouteMapGenerator::new().generate(&candidate, &running);

    assert_eq!(
        rendered(&batches),
        vec!["route-map RM1 permit 10", "route-map RM1 permit 10 | no set metric"]
    );
}

#[test]
fn test_removed_rule_and_removed_map() {
    let running = tree(&[
        "policy route-map RM1 rule 10 action permit",
        "policy route-map RM1 rule 20 action deny",
        "policy route-map RM2 rule 10 action permit",
    ]);
    let candidate = tree(&["policy route-map RM1 rule 10 action permit"]);

    let batches = RouteMapGenerator::new().generate(&candidate, &running);

    assert_eq!(
        rendered(&batches),
        vec!["no route-map RM2", "no route-map RM1 deny 20"]
    );
}

#[test]
fn test_action_change_reapplies_attributes() {
    let running = tree(BASE);
    let mut candidate = running.clone();
    candidate.delete(&["policy", "route-map", "RM1", "rule", "10", "action", "permit"]);
    candidate.set(&["policy", "route-map", "RM1", "rule", "10", "action", "deny"]);

    let batches = RouteMapGenerator::new().generate(&candidate, &running);

    assert_eq!(
        rendered(&batches),
        vec![
            "route-map RM1 deny 10",
            "route-map RM1 deny 10 | match ip address prefix-list PL1",
            "route-map RM1 deny 10 | set metric 100",
        ]
    );
}

#[test]
fn test_qualified_attribute_clears_before_set() {
    let running = tree(&[
        "policy route-map RM1 rule 10 action permit",
        "policy route-map RM1 rule 10 match community community-list 100",
    ]);
    let mut candidate = running.clone();
    candidate.set(&[
        "policy", "route-map", "RM1", "rule", "10", "match", "community", "exact-match",
    ]);

    let attr = attribute("match community").expect("attribute row");
    let cand = open_rule(&candidate, "RM1", "10").expect("candidate rule");
    let run = open_rule(&running, "RM1", "10").expect("running rule");

    assert_eq!(
        attribute_lines(attr, &cand, Some(&run), false),
        vec!["no match community", "match community 100 exact-match"]
    );
}

#[test]
fn test_flags_and_pairs() {
    let candidate = tree(&[
        "policy route-map RM1 rule 10 action permit",
        "policy route-map RM1 rule 10 on-match next",
        "policy route-map RM1 rule 10 set aggregator as 65000",
        "policy route-map RM1 rule 10 set aggregator ip 192.0.2.1",
        "policy route-map RM1 rule 10 set atomic-aggregate",
    ]);
    let cand = open_rule(&candidate, "RM1", "10").expect("candidate rule");

    let next = attribute("on-match next").expect("attribute row");
    let aggregator = attribute("set aggregator as").expect("attribute row");
    let atomic = attribute("set atomic-aggregate").expect("attribute row");

    assert_eq!(attribute_lines(next, &cand, None, false), vec!["on-match next"]);
    assert_eq!(
        attribute_lines(aggregator, &cand, None, false),
        vec!["set aggregator as 65000 192.0.2.1"]
    );
    assert_eq!(
        attribute_lines(atomic, &cand, None, false),
        vec!["set atomic-aggregate"]
    );
}

#[test]
fn test_nexthop_paths_render_as_next_hop() {
    let candidate = tree(&[
        "policy route-map RM1 rule 10 action permit",
        "policy route-map RM1 rule 10 match ip nexthop access-list 10",
        "policy route-map RM1 rule 10 set ip-next-hop 192.0.2.254",
    ]);

    let batches = RouteMapGenerator::new().generate(&candidate, &ConfigTree::new());

    assert_eq!(
        rendered(&batches),
        vec![
            "route-map RM1 permit 10",
            "route-map RM1 permit 10 | match ip next-hop 10",
            "route-map RM1 permit 10 | set ip next-hop 192.0.2.254",
        ]
    );
}

#[test]
fn test_rule_without_valid_action_is_skipped() {
    let candidate = tree(&["policy route-map RM1 rule 10 set metric 5"]);

    let batches = RouteMapGenerator::new().generate(&candidate, &ConfigTree::new());

    assert!(batches.is_empty());
}
