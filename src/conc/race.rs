//! First-failure-wins fan-out with cooperative cancellation.

use std::sync::mpsc;
use std::thread;

use tokio_util::sync::CancellationToken;

use crate::conc::plain::spawn_failure;
use crate::recover::{catch_result, raise_at};
use crate::types::{BoxError, RailResult};

/// Runs every task concurrently and returns as soon as one of them fails.
///
/// Each task receives a clone of one shared [`CancellationToken`]. The first
/// failure cancels it and is returned right away; the remaining tasks keep
/// their threads until they notice the cancellation, and whatever they
/// report afterwards is discarded. When every task succeeds the call returns
/// `Ok(())` after the last one finished.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use panic_rail::conc::{conc_race, CancellationToken};
///
/// type Probe = Box<dyn FnOnce(CancellationToken) -> Result<(), &'static str> + Send>;
///
/// let probes: Vec<Probe> = vec![
///     Box::new(|_: CancellationToken| Err("port 80 closed")),
///     Box::new(|token: CancellationToken| {
///         while !token.is_cancelled() {
///             std::thread::sleep(Duration::from_millis(1));
///         }
///         Ok(())
///     }),
/// ];
///
/// let err = conc_race(probes).unwrap_err();
/// assert_eq!(err.to_string(), "port 80 closed");
/// ```
pub fn conc_race<I, F, E>(tasks: I) -> RailResult<()>
where
    I: IntoIterator<Item = F>,
    F: FnOnce(CancellationToken) -> Result<(), E> + Send + 'static,
    E: Into<BoxError>,
{
    race(None, tasks.into_iter().collect())
}

/// [`conc_race`] under `parent`: tasks get a child of `parent`, so cancelling
/// the parent (for example from a deadline timer) reaches every task.
///
/// Cancellation triggered by a failing task stays within the child and
/// does not cancel `parent`.
pub fn conc_race_with<I, F, E>(parent: &CancellationToken, tasks: I) -> RailResult<()>
where
    I: IntoIterator<Item = F>,
    F: FnOnce(CancellationToken) -> Result<(), E> + Send + 'static,
    E: Into<BoxError>,
{
    race(Some(parent), tasks.into_iter().collect())
}

/// [`conc_race`], raising the first failure with a trace at the caller.
#[inline(never)]
pub fn conc_race_or_raise<I, F, E>(tasks: I)
where
    I: IntoIterator<Item = F>,
    F: FnOnce(CancellationToken) -> Result<(), E> + Send + 'static,
    E: Into<BoxError>,
{
    if let Err(error) = race(None, tasks.into_iter().collect()) {
        raise_at(error, 1);
    }
}

fn race<F, E>(parent: Option<&CancellationToken>, tasks: Vec<F>) -> RailResult<()>
where
    F: FnOnce(CancellationToken) -> Result<(), E> + Send + 'static,
    E: Into<BoxError>,
{
    let total = tasks.len();
    if total == 0 {
        return Ok(());
    }

    let token = match parent {
        Some(parent) => parent.child_token(),
        None => CancellationToken::new(),
    };

    let mut tasks = tasks.into_iter();
    if total == 1 {
        return match tasks.next() {
            Some(task) => catch_result(move || task(token)),
            None => Ok(()),
        };
    }

    let (sender, receiver) = mpsc::sync_channel(1);
    for (index, task) in tasks.enumerate() {
        let task_sender = sender.clone();
        let task_token = token.clone();
        let spawned = thread::Builder::new().name(format!("race-{index}")).spawn(move || {
            if let Err(error) = catch_result(move || task(task_token)) {
                // Only the first failure matters; later ones find the slot full.
                let _ = task_sender.try_send(error);
            }
        });
        if let Err(err) = spawned {
            let _ = sender.try_send(spawn_failure(err));
            break;
        }
    }
    // The channel disconnects once every spawned task dropped its sender.
    drop(sender);

    match receiver.recv() {
        Ok(error) => {
            token.cancel();
            tracing::debug!(tasks = total, error = %error, "race stopped at first failure");
            Err(error)
        },
        Err(mpsc::RecvError) => {
            tracing::debug!(tasks = total, "race finished without failure");
            Ok(())
        },
    }
}
