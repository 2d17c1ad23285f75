//! Tests for the tokio-based runners.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use panic_rail::async_ext::{
    conc_futures, conc_futures_map, conc_race_futures, conc_race_futures_with, FutureRailExt,
};
use panic_rail::conc::CancellationToken;
use panic_rail::{chain, Errs, PanicError, TracedError};

type Job = Pin<Box<dyn Future<Output = Result<(), TracedError>> + Send>>;

fn job<F>(future: F) -> Job
where
    F: Future<Output = Result<(), TracedError>> + Send + 'static,
{
    Box::pin(future)
}

async fn crash() -> Result<(), TracedError> {
    panic!("worker crashed")
}

#[tokio::test]
async fn catch_panic_passes_values_through() {
    let value = async { 21 * 2 }.catch_panic().await;
    assert_eq!(value.ok(), Some(42));
}

#[tokio::test]
async fn catch_panic_converts_panics() {
    let err = crash().catch_panic().await.unwrap_err();

    let panic = chain::find::<PanicError>(&*err).expect("panic error");
    assert_eq!(panic.message(), "worker crashed");
    assert!(chain::has_trace(&*err));
}

#[tokio::test]
async fn conc_futures_keeps_one_slot_per_future() {
    let errs = conc_futures(vec![
        job(async { Ok(()) }),
        job(async { Err(TracedError::plain("disk full")) }),
        job(crash()),
    ])
    .await;

    assert_eq!(errs.len(), 3);
    assert!(errs.get(0).is_none());
    assert_eq!(errs.get(1).map(ToString::to_string).as_deref(), Some("disk full"));
    assert!(chain::find::<PanicError>(&**errs.get(2).expect("slot 2")).is_some());
}

#[tokio::test]
async fn conc_futures_with_no_futures_is_empty() {
    let errs: Errs = conc_futures(Vec::<Job>::new()).await;
    assert!(errs.is_empty());
    assert!(errs.collapse().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn conc_futures_map_preserves_order() {
    let delays = [30_u64, 0, 15, 5];
    let (values, errs) = conc_futures_map(delays.map(|delay| async move {
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok::<_, TracedError>(delay + 1)
    }))
    .await;

    assert!(errs.all_ok());
    assert_eq!(values, [31, 1, 16, 6]);
}

#[tokio::test]
async fn conc_futures_map_defaults_failed_slots() {
    let (values, errs) = conc_futures_map((0..3_u32).map(|n| async move {
        if n == 1 {
            return Err(TracedError::plain("odd one out"));
        }
        Ok(n * 10)
    }))
    .await;

    assert_eq!(values, [0, 0, 20]);
    assert_eq!(errs.failed(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn race_returns_at_first_failure_and_cancels_the_rest() {
    let observed = Arc::new(AtomicUsize::new(0));

    let mut tasks: Vec<Box<dyn FnOnce(CancellationToken) -> Job>> = vec![Box::new(|_| {
        job(async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Err(TracedError::plain("probe failed"))
        })
    })];
    for _ in 0..2 {
        let observed = Arc::clone(&observed);
        tasks.push(Box::new(move |token: CancellationToken| {
            job(async move {
                tokio::select! {
                    _ = token.cancelled() => {
                        observed.fetch_add(1, Ordering::SeqCst);
                    }
                    _ = tokio::time::sleep(Duration::from_millis(100)) => {}
                }
                Ok(())
            })
        }));
    }

    let start = Instant::now();
    let err = conc_race_futures(tasks).await.unwrap_err();
    let elapsed = start.elapsed();

    assert_eq!(err.to_string(), "probe failed");
    assert!(elapsed < Duration::from_millis(80), "race took {elapsed:?}");

    let deadline = Instant::now() + Duration::from_secs(1);
    while observed.load(Ordering::SeqCst) < 2 && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    assert_eq!(observed.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn race_succeeds_when_every_task_succeeds() {
    let finished = Arc::new(AtomicUsize::new(0));
    let tasks = (0..3).map(|_| {
        let finished = Arc::clone(&finished);
        move |_: CancellationToken| async move {
            finished.fetch_add(1, Ordering::SeqCst);
            Ok::<_, TracedError>(())
        }
    });

    assert!(conc_race_futures(tasks).await.is_ok());
    assert_eq!(finished.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn race_under_a_cancelled_parent() {
    let parent = CancellationToken::new();
    parent.cancel();

    let tasks = (0..2).map(|_| {
        |token: CancellationToken| async move {
            if token.is_cancelled() {
                return Err(TracedError::plain("cancelled before start"));
            }
            Ok(())
        }
    });

    let err = conc_race_futures_with(&parent, tasks).await.unwrap_err();
    assert_eq!(err.to_string(), "cancelled before start");
}
