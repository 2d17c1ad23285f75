//! Fan-out over futures on the tokio runtime.
//!
//! These mirror [`crate::conc`]: one spawned task per future instead of one
//! thread per closure, the same slot ordering, and the same first-failure
//! cancellation in race mode. They must be awaited inside a tokio runtime.

use core::future::Future;

use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::async_ext::catch_panic::FutureRailExt;
use crate::recover::recover_payload;
use crate::types::{into_shared, BoxError, Errs, RailResult, SharedError, TracedError};

/// Awaits every future concurrently and returns one slot per future, in
/// input order.
///
/// # Examples
///
/// ```rust
/// use panic_rail::async_ext::conc_futures;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use std::future::Future;
/// use std::pin::Pin;
///
/// type Job = Pin<Box<dyn Future<Output = Result<(), &'static str>> + Send>>;
///
/// let jobs: Vec<Job> = vec![Box::pin(async { Ok(()) }), Box::pin(async { Err("disk full") })];
/// let errs = conc_futures(jobs).await;
///
/// assert_eq!(errs.failed(), 1);
/// assert!(errs.get(1).is_some());
/// # }
/// ```
pub async fn conc_futures<I, Fut, E>(futures: I) -> Errs
where
    I: IntoIterator<Item = Fut>,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    let outcomes = join_in_order(futures.into_iter().collect()).await;
    let total = outcomes.len();
    let errs: Errs = outcomes.into_iter().map(Result::err).collect();
    tracing::debug!(tasks = total, failed = errs.failed(), "concurrent futures finished");
    errs
}

/// Value-producing [`conc_futures`]. Failed slots hold `B::default()`.
pub async fn conc_futures_map<I, Fut, B, E>(futures: I) -> (Vec<B>, Errs)
where
    I: IntoIterator<Item = Fut>,
    Fut: Future<Output = Result<B, E>> + Send + 'static,
    B: Default + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    let outcomes = join_in_order(futures.into_iter().collect()).await;
    let mut values = Vec::with_capacity(outcomes.len());
    let mut errs = Errs::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            Ok(value) => {
                values.push(value);
                errs.push(None);
            },
            Err(error) => {
                values.push(B::default());
                errs.push(Some(error));
            },
        }
    }
    (values, errs)
}

/// Starts every task with a clone of one [`CancellationToken`] and returns at
/// the first failure, cancelling the token.
///
/// Remaining tasks are detached, not aborted: they keep running until they
/// observe the cancellation, and their results are discarded.
pub async fn conc_race_futures<I, F, Fut, E>(tasks: I) -> RailResult<()>
where
    I: IntoIterator<Item = F>,
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    race_in_set(CancellationToken::new(), tasks.into_iter().collect()).await
}

/// [`conc_race_futures`] with tokens derived from `parent`.
pub async fn conc_race_futures_with<I, F, Fut, E>(
    parent: &CancellationToken,
    tasks: I,
) -> RailResult<()>
where
    I: IntoIterator<Item = F>,
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    race_in_set(parent.child_token(), tasks.into_iter().collect()).await
}

async fn join_in_order<Fut, T, E>(futures: Vec<Fut>) -> Vec<RailResult<T>>
where
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    let mut outcomes = Vec::with_capacity(futures.len());
    if futures.len() <= 1 {
        for future in futures {
            outcomes.push(flatten(future.catch_panic().await));
        }
        return outcomes;
    }

    let handles: Vec<_> = futures
        .into_iter()
        .map(|future| tokio::spawn(async move { flatten(future.catch_panic().await) }))
        .collect();
    for handle in handles {
        outcomes.push(match handle.await {
            Ok(outcome) => outcome,
            Err(err) => Err(join_failure(err)),
        });
    }
    outcomes
}

async fn race_in_set<F, Fut, E>(token: CancellationToken, tasks: Vec<F>) -> RailResult<()>
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    let total = tasks.len();
    let mut tasks = tasks.into_iter();
    if total <= 1 {
        return match tasks.next() {
            Some(task) => flatten(task(token).catch_panic().await),
            None => Ok(()),
        };
    }

    let mut set = JoinSet::new();
    for task in tasks {
        set.spawn(task(token.clone()).catch_panic());
    }
    while let Some(joined) = set.join_next().await {
        let outcome = match joined {
            Ok(outcome) => flatten(outcome),
            Err(err) => Err(join_failure(err)),
        };
        if let Err(error) = outcome {
            token.cancel();
            set.detach_all();
            tracing::debug!(tasks = total, error = %error, "future race stopped at first failure");
            return Err(error);
        }
    }
    Ok(())
}

fn flatten<T, E>(outcome: RailResult<Result<T, E>>) -> RailResult<T>
where
    E: Into<BoxError>,
{
    match outcome {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(into_shared(err)),
        Err(error) => Err(error),
    }
}

fn join_failure(err: JoinError) -> SharedError {
    match err.try_into_panic() {
        Ok(payload) => recover_payload(payload),
        Err(err) => into_shared(TracedError::wrap(err, "task did not complete")),
    }
}
