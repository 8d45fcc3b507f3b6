mod common;

use common::*;
use parking_lot::Mutex;
use std::sync::Arc;
use tasker_batch::{CancelReason, Context, Group};

async fn step_run(ctx: Context, idx: u64) -> Result<(), DemoError> {
    if let Some(reason) = ctx.err() {
        tracing::info!(num = idx, "task no");
        return Err(DemoError::wrong_context(reason));
    }
    tokio::time::sleep(scattered_delay(idx, 40)).await;
    if idx % 10 == 3 {
        tracing::info!(num = idx, "task wa");
        return Err(DemoError::service(format!("task wa {idx}")));
    }
    tracing::info!(num = idx, "task ok");
    Ok(())
}

#[tokio::test]
async fn test_group_keeps_caller_context_live() {
    let ctx = Context::background();
    let mut group = Group::<DemoError>::new(&ctx);

    // Units see the group's own context, which is cancelled once wait returns
    let seen: Arc<Mutex<Vec<Context>>> = Arc::new(Mutex::new(Vec::new()));
    for _ in 0..50 {
        let seen = Arc::clone(&seen);
        group
            .go(move |unit_ctx| async move {
                seen.lock().push(unit_ctx);
                Ok(())
            })
            .await;
    }

    assert!(group.wait().await.is_ok());
    assert!(ctx.err().is_none());

    let seen = seen.lock();
    assert_eq!(seen.len(), 50);
    assert!(seen
        .iter()
        .all(|unit_ctx| unit_ctx.err() == Some(CancelReason::Canceled)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_step_run_fail_fast() {
    init_test_logging();
    let mut group = Group::<DemoError>::new(&Context::background());
    group.set_limit(10).unwrap();

    for idx in 0..50u64 {
        group.go(move |ctx| step_run(ctx, idx)).await;
    }

    let err = group.wait().await.unwrap_err();
    assert_eq!(err.code(), "SERVICE_ERROR");
}

#[tokio::test]
async fn test_first_error_is_one_of_the_failures() {
    let mut group = Group::<DemoError>::new(&Context::background());
    for idx in 0..8u64 {
        group
            .go(move |_ctx| async move { Err(DemoError::service(format!("unit {idx}"))) })
            .await;
    }

    let err = group.wait().await.unwrap_err();
    let expected: Vec<DemoError> = (0..8)
        .map(|idx| DemoError::service(format!("unit {idx}")))
        .collect();
    assert!(expected.contains(&err));
}

#[tokio::test]
async fn test_try_go_without_limit_always_starts() {
    let mut group = Group::<DemoError>::new(&Context::background());
    for _ in 0..16 {
        assert!(group.try_go(|_ctx| async { Ok(()) }));
    }
    assert_eq!(group.len(), 16);
    assert!(group.wait().await.is_ok());
}

#[tokio::test]
async fn test_cancelled_parent_fails_fast_units() {
    let (parent, cancel) = Context::with_cancel(&Context::background());
    cancel.cancel();

    let mut group = Group::<DemoError>::new(&parent);
    group.go(|ctx| step_run(ctx, 1)).await;

    assert_eq!(
        group.wait().await,
        Err(DemoError::wrong_context(CancelReason::Canceled))
    );
}
