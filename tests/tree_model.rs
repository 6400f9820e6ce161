use std::error::Error;

use proptest::prelude::*;

use confsync::errors::SyncError;
use confsync::tree::{ConfigTree, differs, dump_against, paths_overlap};
use confsync_test_utils::builders::{path, tree};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn test_value_is_lone_child() -> TestResult {
    let t = tree(&["policy prefix-list PL1 rule 10 action permit"]);

    assert_eq!(
        t.value(&path("policy prefix-list PL1 rule 10 action")),
        Some("permit")
    );
    assert_eq!(t.values(&path("policy prefix-list")), vec!["PL1".to_string()]);
    assert!(t.contains(&path("policy prefix-list PL1 rule 10")));
    assert_eq!(t.try_value(&path("policy prefix-list PL1 rule 10 action"))?, Some("permit"));
    Ok(())
}

#[test]
fn test_over_cardinality_is_soft_in_value_and_hard_in_try_value() {
    let t = tree(&[
        "policy prefix-list PL1 rule 10 action permit",
        "policy prefix-list PL1 rule 10 action deny",
    ]);
    let action = path("policy prefix-list PL1 rule 10 action");

    assert_eq!(t.value(&action), None);
    assert!(matches!(t.try_value(&action), Err(SyncError::Cardinality(_))));
}

#[test]
fn test_empty_path_is_not_addressable() {
    let mut t = tree(&["interfaces eth0"]);
    let empty: Vec<String> = Vec::new();

    assert!(t.lookup(&empty).is_none());
    assert!(!t.delete(&empty));
    t.set(&empty);
    assert_eq!(t, tree(&["interfaces eth0"]));
}

#[test]
fn test_delete_missing_path_is_noop() {
    let mut t = tree(&["policy prefix-list PL1 rule 10 action permit"]);
    let before = t.clone();

    assert!(!t.delete(&path("policy route-map RM1")));
    assert!(!t.delete(&path("policy prefix-list PL2 rule 10")));
    assert_eq!(t, before);
}

#[test]
fn test_delete_keeps_empty_ancestors() {
    let mut t = tree(&["policy prefix-list PL1 rule 10 action permit"]);

    assert!(t.delete(&path("policy prefix-list PL1")));
    assert!(t.contains(&path("policy prefix-list")));
    assert!(t.values(&path("policy prefix-list")).is_empty());
}

#[test]
fn test_differs_at_subtree() {
    let a = tree(&[
        "policy prefix-list PL1 rule 10 action permit",
        "policy route-map RM1 rule 10 action permit",
    ]);
    let b = tree(&[
        "policy prefix-list PL1 rule 10 action deny",
        "policy route-map RM1 rule 10 action permit",
    ]);

    assert!(a.differs_at(&b, &path("policy prefix-list")));
    assert!(!a.differs_at(&b, &path("policy route-map")));
    assert!(!a.differs_at(&b, &path("policy access-list")));
}

#[test]
fn test_dump_marks_additions_and_removals() {
    let running = tree(&["policy prefix-list OLD"]);
    let candidate = tree(&["policy prefix-list NEW"]);

    let dump = dump_against(&running, &candidate);

    let lines: Vec<&str> = dump.lines().collect();
    assert_eq!(lines[0], "  policy");
    assert!(lines.iter().any(|l| l.starts_with('+') && l.trim_end().ends_with("NEW")));
    assert!(lines.iter().any(|l| l.starts_with('-') && l.trim_end().ends_with("OLD")));
}

#[test]
fn test_paths_overlap_in_both_directions() {
    assert!(paths_overlap(&["policy", "prefix-list"], &["policy"]));
    assert!(paths_overlap(&["policy"], &["policy", "prefix-list"]));
    assert!(!paths_overlap(&["policy", "route-map"], &["policy", "prefix-list"]));
}

fn label() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "10", "20", "permit"]).prop_map(str::to_string)
}

fn config_path() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(label(), 1..5)
}

fn paths() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(config_path(), 0..12)
}

fn build(paths: &[Vec<String>]) -> ConfigTree {
    let mut t = ConfigTree::new();
    for p in paths {
        t.set(p);
    }
    t
}

proptest! {
    #[test]
    fn prop_set_is_idempotent(base in paths(), p in config_path()) {
        let mut once = build(&base);
        once.set(&p);
        let mut twice = once.clone();
        twice.set(&p);
        prop_assert_eq!(&once, &twice);
        prop_assert!(!differs(Some(once.root()), Some(twice.root())));
    }

    #[test]
    fn prop_delete_undoes_set(base in paths(), p in config_path()) {
        let mut t = build(&base);
        t.set(&p);
        prop_assert!(t.delete(&p));
        prop_assert!(t.lookup(&p).is_none());
    }

    #[test]
    fn prop_differs_is_symmetric(a in paths(), b in paths()) {
        let ta = build(&a);
        let tb = build(&b);
        prop_assert_eq!(
            differs(Some(ta.root()), Some(tb.root())),
            differs(Some(tb.root()), Some(ta.root()))
        );
    }

    #[test]
    fn prop_insertion_order_does_not_matter(a in paths()) {
        let forward = build(&a);
        let mut reversed_paths = a.clone();
        reversed_paths.reverse();
        let reversed = build(&reversed_paths);
        prop_assert!(!differs(Some(forward.root()), Some(reversed.root())));
        prop_assert!(!differs(Some(forward.root()), Some(forward.root())));
    }
}
