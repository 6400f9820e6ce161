use std::error::Error;

use tokio::sync::mpsc;

use confsync::engine::{EngineOptions, ProtocolEvent, Runtime, SyncEngine};
use confsync::exec::DryRunExecutor;
use confsync::transport::replay;
use confsync_test_utils::builders::TransactionBuilder;
use confsync_test_utils::recording_executor::RecordingExecutor;
use confsync_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn prefix_list_txn() -> TransactionBuilder {
    TransactionBuilder::new()
        .set("policy prefix-list PL1 rule 10 action permit")
        .set("policy prefix-list PL1 rule 10 prefix 10.0.0.0/8")
}

fn runtime(executor: RecordingExecutor) -> Runtime<RecordingExecutor> {
    Runtime::new(SyncEngine::policy(EngineOptions::default()), executor)
}

#[tokio::test]
async fn test_replay_runs_batches_in_order() -> TestResult {
    init_tracing();
    let executor = RecordingExecutor::new();
    let mut rt = runtime(executor.clone());

    let stats = with_timeout(replay(&mut rt, prefix_list_txn().subscribed_events())).await?;

    assert_eq!(stats.batches_executed, 2);
    assert_eq!(stats.batches_failed, 0);
    assert_eq!(stats.validations, 1);
    assert!(!stats.shutdown);
    assert_eq!(
        executor.commands(),
        vec!["no ip prefix-list PL1", "ip prefix-list PL1 seq 10 permit 10.0.0.0/8"]
    );
    Ok(())
}

#[tokio::test]
async fn test_failed_batch_does_not_stop_later_batches() -> TestResult {
    init_tracing();
    let executor = RecordingExecutor::failing_on("no ip prefix-list");
    let mut rt = runtime(executor.clone());

    let stats = with_timeout(replay(&mut rt, prefix_list_txn().subscribed_events())).await?;

    assert_eq!(stats.batches_failed, 1);
    assert_eq!(stats.batches_executed, 1);
    assert_eq!(executor.batches().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_running_survives_between_sessions() -> TestResult {
    init_tracing();
    let executor = RecordingExecutor::new();
    let mut rt = runtime(executor.clone());

    with_timeout(replay(&mut rt, prefix_list_txn().subscribed_events())).await?;
    // Second session replays the same config after a reconnect: nothing to do.
    with_timeout(replay(&mut rt, prefix_list_txn().subscribed_events())).await?;

    assert_eq!(executor.batches().len(), 2);
    assert!(rt.engine().running().contains(&["policy", "prefix-list", "PL1"]));
    Ok(())
}

#[tokio::test]
async fn test_verdicts_are_sent_to_reply_channel() -> TestResult {
    init_tracing();
    let mut rt = runtime(RecordingExecutor::new());
    let (event_tx, event_rx) = mpsc::channel(16);
    let (reply_tx, mut reply_rx) = mpsc::channel(4);

    let txn = TransactionBuilder::new()
        .set("policy route-map RM1 rule 10 action permit")
        .set("policy route-map RM1 rule 10 call MISSING")
        .validate_only();
    for event in txn.subscribed_events() {
        event_tx.send(event).await?;
    }
    event_tx.send(ProtocolEvent::ShutdownRequested).await?;

    let stats = with_timeout(rt.run_session(event_rx, Some(reply_tx))).await?;
    let verdict = reply_rx.recv().await.ok_or("no verdict")?;

    assert!(stats.shutdown);
    assert!(!verdict.passed);
    assert!(
        verdict
            .diagnostics
            .iter()
            .any(|l| l == "called route-map MISSING does not exist.")
    );
    Ok(())
}

#[tokio::test]
async fn test_dry_run_counts_batches() -> TestResult {
    init_tracing();
    let mut rt = Runtime::new(
        SyncEngine::policy(EngineOptions::default()),
        DryRunExecutor::new(),
    );

    let stats = with_timeout(replay(&mut rt, prefix_list_txn().subscribed_events())).await?;

    assert_eq!(stats.batches_executed, 2);
    assert_eq!(rt.executor().executed(), 2);
    Ok(())
}
