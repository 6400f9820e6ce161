use confsync::commit::{CommitGenerator, ListGenerator};
use confsync::exec::{CONFIGURE_TERMINAL, CommandBatch};
use confsync::policy::sort_rules;
use confsync::tree::ConfigTree;
use confsync_test_utils::builders::tree;

fn commands(batches: &[CommandBatch]) -> Vec<String> {
    batches
        .iter()
        .filter_map(|b| b.command().map(str::to_string))
        .collect()
}

#[test]
fn test_every_batch_enters_configuration_mode() {
    let candidate = tree(&[
        "policy prefix-list PL1 rule 10 action permit",
        "policy prefix-list PL1 rule 10 prefix 10.0.0.0/8",
    ]);

    let batches = ListGenerator::prefix_list().generate(&candidate, &ConfigTree::new());

    assert_eq!(batches.len(), 2);
    for batch in &batches {
        assert_eq!(batch.lines()[0], CONFIGURE_TERMINAL);
        assert_eq!(batch.lines().len(), 2);
    }
}

#[test]
fn test_new_prefix_list_is_removed_then_rebuilt() {
    let candidate = tree(&[
        "policy prefix-list PL1 rule 10 action permit",
        "policy prefix-list PL1 rule 10 prefix 10.0.0.0/8",
        "policy prefix-list PL1 rule 20 action deny",
        "policy prefix-list PL1 rule 20 prefix 192.168.0.0/16",
        "policy prefix-list PL1 rule 20 ge 24",
        "policy prefix-list PL1 rule 20 le 32",
    ]);

    let batches = ListGenerator::prefix_list().generate(&candidate, &ConfigTree::new());

    assert_eq!(
        commands(&batches),
        vec![
            "no ip prefix-list PL1",
            "ip prefix-list PL1 seq 10 permit 10.0.0.0/8",
            "ip prefix-list PL1 seq 20 deny 192.168.0.0/16 ge 24 le 32",
        ]
    );
}

#[test]
fn test_removed_list_emits_single_remove() {
    let running = tree(&[
        "policy prefix-list PL1 rule 10 action permit",
        "policy prefix-list PL1 rule 10 prefix 10.0.0.0/8",
    ]);
    let candidate = tree(&["policy prefix-list"]);

    let batches = ListGenerator::prefix_list().generate(&candidate, &running);

    assert_eq!(commands(&batches), vec!["no ip prefix-list PL1"]);
}

#[test]
fn test_unchanged_lists_are_left_alone() {
    let both = tree(&[
        "policy prefix-list PL1 rule 10 action permit",
        "policy prefix-list PL1 rule 10 prefix 10.0.0.0/8",
        "policy prefix-list PL2 rule 10 action deny",
        "policy prefix-list PL2 rule 10 prefix 10.0.0.0/8",
    ]);
    let mut candidate = both.clone();
    candidate.set(&["policy", "prefix-list", "PL2", "rule", "20", "action", "permit"]);
    candidate.set(&["policy", "prefix-list", "PL2", "rule", "20", "prefix", "0.0.0.0/0"]);

    let batches = ListGenerator::prefix_list().generate(&candidate, &both);

    assert_eq!(
        commands(&batches),
        vec![
            "no ip prefix-list PL2",
            "ip prefix-list PL2 seq 10 deny 10.0.0.0/8",
            "ip prefix-list PL2 seq 20 permit 0.0.0.0/0",
        ]
    );
}

#[test]
fn test_rules_follow_numeric_order() {
    let candidate = tree(&[
        "policy as-path-list AP rule 20 action permit",
        "policy as-path-list AP rule 20 regex ^65000_",
        "policy as-path-list AP rule 5 action deny",
        "policy as-path-list AP rule 5 regex _65001$",
        "policy as-path-list AP rule 100 action permit",
        "policy as-path-list AP rule 100 regex .*",
    ]);

    let batches = ListGenerator::as_path_list().generate(&candidate, &ConfigTree::new());

    assert_eq!(
        commands(&batches),
        vec![
            "no ip as-path access-list AP",
            "ip as-path access-list AP deny _65001$",
            "ip as-path access-list AP permit ^65000_",
            "ip as-path access-list AP permit .*",
        ]
    );
}

#[test]
fn test_non_numeric_rules_sort_last() {
    let sorted = sort_rules(vec![
        "b".to_string(),
        "100".to_string(),
        "a".to_string(),
        "5".to_string(),
    ]);
    assert_eq!(sorted, vec!["5", "100", "b", "a"]);
}

#[test]
fn test_standard_and_extended_access_lists() {
    let candidate = tree(&[
        "policy access-list 10 rule 1 action permit",
        "policy access-list 10 rule 1 source host 192.0.2.1",
        "policy access-list 10 rule 2 action deny",
        "policy access-list 10 rule 2 source any",
        "policy access-list 150 rule 1 action permit",
        "policy access-list 150 rule 1 source network 10.0.0.0",
        "policy access-list 150 rule 1 source inverse-mask 0.255.255.255",
        "policy access-list 150 rule 1 destination any",
    ]);

    let batches = ListGenerator::access_list().generate(&candidate, &ConfigTree::new());

    assert_eq!(
        commands(&batches),
        vec![
            "no access-list 10",
            "access-list 10 permit host 192.0.2.1",
            "access-list 10 deny any",
            "no access-list 150",
            "access-list 150 permit ip 10.0.0.0 0.255.255.255 any",
        ]
    );
}

#[test]
fn test_incomplete_rules_are_skipped() {
    let candidate = tree(&[
        "policy access-list 150 rule 1 action permit",
        "policy access-list 150 rule 1 source any",
        "policy community-list 10 rule 1 action permit",
    ]);

    let acl = ListGenerator::access_list().generate(&candidate, &ConfigTree::new());
    let community = ListGenerator::community_list().generate(&candidate, &ConfigTree::new());

    assert_eq!(commands(&acl), vec!["no access-list 150"]);
    assert_eq!(commands(&community), vec!["no ip community-list 10"]);
}

#[test]
fn test_ipv6_lists() {
    let candidate = tree(&[
        "policy access-list6 v6-in rule 10 action permit",
        "policy access-list6 v6-in rule 10 source network 2001:db8::/32",
        "policy access-list6 v6-in rule 10 source exact-match",
        "policy access-list6 v6-in rule 20 action deny",
        "policy access-list6 v6-in rule 20 source any",
        "policy prefix-list6 P6 rule 5 action permit",
        "policy prefix-list6 P6 rule 5 prefix 2001:db8::/32",
        "policy prefix-list6 P6 rule 5 le 64",
    ]);

    let acl6 = ListGenerator::access_list6().generate(&candidate, &ConfigTree::new());
    let pfx6 = ListGenerator::prefix_list6().generate(&candidate, &ConfigTree::new());

    assert_eq!(
        commands(&acl6),
        vec![
            "no ipv6 access-list v6-in",
            "ipv6 access-list v6-in permit 2001:db8::/32 exact-match",
            "ipv6 access-list v6-in deny any",
        ]
    );
    assert_eq!(
        commands(&pfx6),
        vec![
            "no ipv6 prefix-list P6",
            "ipv6 prefix-list P6 seq 5 permit 2001:db8::/32 le 64",
        ]
    );
}

#[test]
fn test_community_list_rules() {
    let candidate = tree(&[
        "policy community-list 100 rule 10 action permit",
        "policy community-list 100 rule 10 regex 65000:.*",
    ]);

    let batches = ListGenerator::community_list().generate(&candidate, &ConfigTree::new());

    assert_eq!(
        commands(&batches),
        vec![
            "no ip community-list 100",
            "ip community-list 100 permit 65000:.*",
        ]
    );
}
