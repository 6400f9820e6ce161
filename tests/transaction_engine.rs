use confsync::engine::{CommitMode, EngineOptions, ProtocolEvent, SessionPhase, SyncEngine};
use confsync::tree::ConfigTree;
use confsync_test_utils::builders::{TransactionBuilder, drive, path, tree};
use confsync_test_utils::init_tracing;

fn engine(mode: CommitMode) -> SyncEngine {
    let mut engine = SyncEngine::policy(EngineOptions {
        mode,
        dump_state: true,
    });
    engine.step(ProtocolEvent::Subscribed);
    engine
}

fn add_pl1() -> TransactionBuilder {
    TransactionBuilder::new()
        .set("policy prefix-list PL1 rule 10 action permit")
        .set("policy prefix-list PL1 rule 10 prefix 10.0.0.0/8")
}

#[test]
fn test_add_then_remove_prefix_list() {
    init_tracing();
    let mut engine = engine(CommitMode::Lazy);

    let added = drive(&mut engine, add_pl1().events());

    assert_eq!(added.verdicts.len(), 1);
    assert!(added.verdicts[0].passed);
    assert_eq!(
        added.commands(),
        vec!["no ip prefix-list PL1", "ip prefix-list PL1 seq 10 permit 10.0.0.0/8"]
    );
    assert_eq!(added.subsystems(), vec!["prefix-list"]);
    assert_eq!(
        engine.running().value(&path("policy prefix-list PL1 rule 10 prefix")),
        Some("10.0.0.0/8")
    );

    let removed = drive(
        &mut engine,
        TransactionBuilder::new().delete("policy prefix-list PL1").events(),
    );

    assert!(removed.verdicts[0].passed);
    assert_eq!(removed.commands(), vec!["no ip prefix-list PL1"]);
    assert!(!engine.running().contains(&path("policy prefix-list PL1")));
}

#[test]
fn test_commit_guard_runs_generator_once() {
    init_tracing();
    let mut engine = engine(CommitMode::Lazy);

    let log = drive(
        &mut engine,
        add_pl1()
            .set("policy prefix-list PL1 rule 20 action deny")
            .set("policy prefix-list PL1 rule 20 prefix 0.0.0.0/0")
            .events(),
    );

    let removes = log
        .commands()
        .iter()
        .filter(|c| c.as_str() == "no ip prefix-list PL1")
        .count();
    assert_eq!(removes, 1);
    assert_eq!(log.pushes.len(), 3);
}

#[test]
fn test_noop_transaction_pushes_nothing() {
    init_tracing();
    let mut engine = engine(CommitMode::Lazy);
    drive(&mut engine, add_pl1().events());

    let log = drive(&mut engine, TransactionBuilder::new().events());

    assert!(log.verdicts[0].passed);
    assert!(log.pushes.is_empty());
    assert!(engine.commits().guards().is_empty());
}

#[test]
fn test_redelivered_identical_config_pushes_nothing() {
    init_tracing();
    let mut engine = engine(CommitMode::Lazy);
    drive(&mut engine, add_pl1().events());

    let log = drive(&mut engine, add_pl1().events());

    assert!(log.pushes.is_empty());
    assert!(engine.commits().guards().is_empty());
}

#[test]
fn test_guard_is_set_only_for_pushed_subsystems() {
    init_tracing();
    let mut engine = engine(CommitMode::Lazy);
    drive(&mut engine, add_pl1().events());

    let log = drive(
        &mut engine,
        add_pl1()
            .set("policy access-list 10 rule 1 action permit")
            .set("policy access-list 10 rule 1 source any")
            .events(),
    );

    assert_eq!(log.subsystems(), vec!["access-list"]);
    assert_eq!(engine.commits().guards(), vec!["access-list"]);
}

#[test]
fn test_validation_failure_blocks_commit() {
    init_tracing();
    let mut engine = engine(CommitMode::Lazy);

    let log = drive(
        &mut engine,
        TransactionBuilder::new()
            .set("policy prefix-list PL1 rule 10 action allow")
            .set("policy prefix-list PL1 rule 10 prefix 10.0.0.0/8")
            .events(),
    );

    let verdict = &log.verdicts[0];
    assert!(!verdict.passed);
    assert!(
        verdict
            .diagnostics
            .iter()
            .any(|l| l == "action must be permit or deny.")
    );
    assert!(log.pushes.is_empty());
}

#[test]
fn test_blocked_commit_lands_in_running_and_converges_on_next_edit() {
    init_tracing();
    let mut engine = engine(CommitMode::Lazy);

    let blocked = drive(
        &mut engine,
        add_pl1()
            .set("policy route-map RM1 rule 10 action permit")
            .set("policy route-map RM1 rule 10 match ip address prefix-list NOPE")
            .events(),
    );

    assert!(!blocked.verdicts[0].passed);
    assert!(blocked.pushes.is_empty());
    assert!(engine.running().contains(&path("policy prefix-list PL1 rule 10")));
    assert!(engine.running().contains(&path("policy route-map RM1")));

    let next = drive(
        &mut engine,
        TransactionBuilder::new()
            .set("policy prefix-list PL1 rule 20 action deny")
            .set("policy prefix-list PL1 rule 20 prefix 0.0.0.0/0")
            .delete("policy route-map RM1")
            .events(),
    );

    assert!(next.verdicts[0].passed);
    assert_eq!(
        next.commands(),
        vec![
            "no ip prefix-list PL1",
            "ip prefix-list PL1 seq 10 permit 10.0.0.0/8",
            "ip prefix-list PL1 seq 20 deny 0.0.0.0/0",
            "no route-map RM1",
        ]
    );
}

#[test]
fn test_eager_mode_matches_lazy_mode() {
    init_tracing();
    let txn = add_pl1()
        .set("policy route-map RM1 rule 10 action permit")
        .set("policy route-map RM1 rule 10 match ip address prefix-list PL1")
        .set("policy route-map RM1 rule 10 set local-preference 200");

    let mut lazy = engine(CommitMode::Lazy);
    let mut eager = engine(CommitMode::Eager);
    let lazy_log = drive(&mut lazy, txn.events());
    let eager_log = drive(&mut eager, txn.events());

    assert_eq!(lazy_log.pushes, eager_log.pushes);
    assert_eq!(lazy_log.subsystems(), vec!["prefix-list", "route-map"]);
    assert_eq!(lazy.running(), eager.running());
}

#[test]
fn test_events_before_subscription_are_ignored() {
    init_tracing();
    let mut engine = SyncEngine::policy(EngineOptions::default());

    let log = drive(&mut engine, add_pl1().events());

    assert_eq!(engine.phase(), SessionPhase::Idle);
    assert!(log.verdicts.is_empty());
    assert!(log.pushes.is_empty());
    assert_eq!(engine.running(), &ConfigTree::new());
}

#[test]
fn test_disconnect_resets_transaction_but_keeps_running() {
    init_tracing();
    let mut engine = engine(CommitMode::Lazy);
    drive(&mut engine, add_pl1().events());
    let running = engine.running().clone();

    drive(
        &mut engine,
        vec![
            ProtocolEvent::ValidateStart,
            ProtocolEvent::Set(path("policy prefix-list PL2 rule 10 action permit")),
            ProtocolEvent::Disconnected,
        ],
    );

    assert_eq!(engine.phase(), SessionPhase::Idle);
    assert!(engine.transaction().verdict.is_none());
    assert!(!engine.transaction().commit_open);
    assert_eq!(engine.running(), &running);

    engine.step(ProtocolEvent::Subscribed);
    assert_eq!(engine.phase(), SessionPhase::Open);
}

#[test]
fn test_validate_end_without_start_fails() {
    init_tracing();
    let mut engine = engine(CommitMode::Lazy);

    let log = drive(&mut engine, vec![ProtocolEvent::ValidateEnd]);

    assert!(!log.verdicts[0].passed);
    assert_eq!(log.verdicts[0].diagnostics, vec!["validation was not started."]);
}

#[test]
fn test_validation_mutates_candidate_only() {
    init_tracing();
    let mut engine = engine(CommitMode::Lazy);

    drive(
        &mut engine,
        vec![
            ProtocolEvent::ValidateStart,
            ProtocolEvent::Set(path("policy prefix-list PL1 rule 10 action permit")),
        ],
    );

    assert_eq!(engine.phase(), SessionPhase::Validating);
    assert!(engine.candidate().contains(&path("policy prefix-list PL1")));
    assert!(engine.running().is_empty());
}

#[test]
fn test_mutations_outside_commit_window_update_running_silently() {
    init_tracing();
    let mut engine = engine(CommitMode::Lazy);

    let log = drive(
        &mut engine,
        vec![ProtocolEvent::Set(path("interfaces interface eth0 description uplink"))],
    );

    assert!(log.pushes.is_empty());
    assert_eq!(
        engine.running(),
        &tree(&["interfaces interface eth0 description uplink"])
    );
}

#[test]
fn test_shutdown_stops_the_loop() {
    let mut engine = engine(CommitMode::Lazy);
    assert!(engine.step(ProtocolEvent::CommitEnd).keep_running);
    assert!(!engine.step(ProtocolEvent::ShutdownRequested).keep_running);
}
