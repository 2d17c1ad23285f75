//! Wait-for-all fan-out.
//!
//! Every task runs to completion on its own scoped thread, even after a
//! sibling failed. Results come back in input order.

use std::thread;

use crate::recover::{catch_result, raise_at, recover_payload};
use crate::types::{into_shared, BoxError, Errs, RailResult, SharedError, TracedError};

/// Runs every task concurrently and returns one slot per task, in input order.
///
/// A task fails by returning `Err` or by unwinding; either way the failure
/// lands in its slot and the other tasks are unaffected.
///
/// # Examples
///
/// ```
/// use panic_rail::conc::conc_errs;
///
/// let errs = conc_errs([
///     Box::new(|| Ok(())) as Box<dyn FnOnce() -> Result<(), std::io::Error> + Send>,
///     Box::new(|| Err(std::io::Error::other("refused"))),
///     Box::new(|| Ok(())),
/// ]);
///
/// assert_eq!(errs.len(), 3);
/// assert!(errs.get(0).is_none());
/// assert_eq!(errs.get(1).map(|e| e.to_string()).as_deref(), Some("refused"));
/// ```
pub fn conc_errs<I, F, E>(tasks: I) -> Errs
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Result<(), E> + Send,
    E: Into<BoxError>,
{
    let outcomes = run_all(tasks.into_iter().collect());
    let total = outcomes.len();
    let errs: Errs = outcomes.into_iter().map(Result::err).collect();
    tracing::debug!(tasks = total, failed = errs.failed(), "concurrent run finished");
    errs
}

/// [`conc_errs`], collapsed: one failure comes back as itself, several as an
/// [`Errs`].
pub fn conc<I, F, E>(tasks: I) -> RailResult<()>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Result<(), E> + Send,
    E: Into<BoxError>,
{
    conc_errs(tasks).into_result()
}

/// [`conc`], raising the failure with a trace at the caller.
#[inline(never)]
pub fn conc_or_raise<I, F, E>(tasks: I)
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Result<(), E> + Send,
    E: Into<BoxError>,
{
    if let Some(error) = conc_errs(tasks).collapse() {
        raise_at(error, 1);
    }
}

/// Applies `f` to every input concurrently.
///
/// Returns the produced values and one error slot per input, both in input
/// order. A failed input leaves `B::default()` in its value slot.
///
/// # Examples
///
/// ```
/// use panic_rail::conc::conc_map_errs;
///
/// let (lengths, errs) = conc_map_errs(["alpha", "", "gamma"], |word: &str| {
///     if word.is_empty() {
///         return Err("empty word");
///     }
///     Ok(word.len())
/// });
///
/// assert_eq!(lengths, vec![5, 0, 5]);
/// assert_eq!(errs.failed(), 1);
/// assert!(errs.get(1).is_some());
/// ```
pub fn conc_map_errs<I, A, B, E, F>(inputs: I, f: F) -> (Vec<B>, Errs)
where
    I: IntoIterator<Item = A>,
    A: Send,
    B: Default + Send,
    E: Into<BoxError>,
    F: Fn(A) -> Result<B, E> + Sync,
{
    let f = &f;
    let tasks: Vec<_> = inputs.into_iter().map(|input| move || f(input)).collect();
    let outcomes = run_all(tasks);
    let total = outcomes.len();

    let mut values = Vec::with_capacity(total);
    let mut errs = Errs::with_capacity(total);
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
    tracing::debug!(tasks = total, failed = errs.failed(), "concurrent map finished");
    (values, errs)
}

/// [`conc_map_errs`], collapsed. Values are only returned when every input
/// succeeded.
pub fn conc_map<I, A, B, E, F>(inputs: I, f: F) -> RailResult<Vec<B>>
where
    I: IntoIterator<Item = A>,
    A: Send,
    B: Default + Send,
    E: Into<BoxError>,
    F: Fn(A) -> Result<B, E> + Sync,
{
    let (values, errs) = conc_map_errs(inputs, f);
    errs.into_result().map(|()| values)
}

/// [`conc_map`], raising the failure with a trace at the caller.
#[inline(never)]
pub fn conc_map_or_raise<I, A, B, E, F>(inputs: I, f: F) -> Vec<B>
where
    I: IntoIterator<Item = A>,
    A: Send,
    B: Default + Send,
    E: Into<BoxError>,
    F: Fn(A) -> Result<B, E> + Sync,
{
    let (values, errs) = conc_map_errs(inputs, f);
    if let Some(error) = errs.collapse() {
        raise_at(error, 1);
    }
    values
}

/// Runs `tasks` and joins them in input order.
///
/// Zero tasks spawn nothing; a single task runs on the calling thread.
fn run_all<F, T, E>(tasks: Vec<F>) -> Vec<RailResult<T>>
where
    F: FnOnce() -> Result<T, E> + Send,
    T: Send,
    E: Into<BoxError>,
{
    if tasks.len() <= 1 {
        return tasks.into_iter().map(catch_result).collect();
    }

    thread::scope(|scope| {
        let handles: Vec<_> = tasks
            .into_iter()
            .enumerate()
            .map(|(index, task)| {
                thread::Builder::new()
                    .name(format!("conc-{index}"))
                    .spawn_scoped(scope, move || catch_result(task))
            })
            .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(index, handle)| {
                let outcome = match handle {
                    Ok(handle) => {
                        handle.join().unwrap_or_else(|payload| Err(recover_payload(payload)))
                    },
                    Err(err) => Err(spawn_failure(err)),
                };
                if let Err(error) = &outcome {
                    tracing::debug!(task = index, error = %error, "task failed");
                }
                outcome
            })
            .collect()
    })
}

pub(crate) fn spawn_failure(err: std::io::Error) -> SharedError {
    tracing::warn!(error = %err, "failed to spawn task thread");
    into_shared(TracedError::wrap(err, "spawning task thread"))
}
