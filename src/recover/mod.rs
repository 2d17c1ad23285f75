//! Conversion between unwinding and error values.
//!
//! [`raise`] turns an error into an unwind carrying a [`SharedError`], with a
//! trace attached if the chain has none. [`catch`], [`catch_result`], and
//! [`rec`] stop an unwind and turn whatever it carried back into a
//! `SharedError` through [`recover_payload`].
//!
//! A raised error goes through `std::panic::resume_unwind`, so the panic hook
//! does not run and nothing is printed for it. Ordinary panics still print
//! the usual message; their payload is converted into a
//! [`PanicError`](crate::PanicError) when caught.
//!
//! # Examples
//!
//! ```
//! use panic_rail::recover::{catch, raise};
//! use panic_rail::{chain, TracedError};
//!
//! fn load(id: u32) -> u32 {
//!     if id == 0 {
//!         raise(TracedError::plain("no such user"));
//!     }
//!     id
//! }
//!
//! assert_eq!(catch(|| load(7)).ok(), Some(7));
//!
//! let err = catch(|| load(0)).unwrap_err();
//! assert_eq!(err.to_string(), "no such user");
//! assert!(chain::has_trace(&*err));
//! ```

use std::any::Any;
use std::error::Error;
use std::panic::{self, AssertUnwindSafe};
use std::process;
use std::sync::Arc;

mod panic_hook;

pub use panic_hook::{install_panic_hook, panic_hook_installed};

use crate::chain;
use crate::types::{
    into_shared, render_with_trace, trace_config, BoxError, Errs, PanicError, RailResult,
    SharedError, Trace, TracedError,
};

/// Unwinds with `err`, attaching a trace starting at the caller if the chain
/// has none yet.
#[inline(never)]
pub fn raise<E>(err: E) -> !
where
    E: Into<BoxError>,
{
    raise_at(err, 1)
}

/// Like [`raise`], skipping `skip` extra frames above the caller.
///
/// Helpers that raise on behalf of their caller pass `1` so the trace points
/// at the call to the helper.
#[inline(never)]
pub fn raise_at<E>(err: E, skip: usize) -> !
where
    E: Into<BoxError>,
{
    let error = into_shared(err);
    let error = if chain::has_trace(&*error) {
        error
    } else {
        let trace = Trace::capture(skip.saturating_add(1));
        attach_trace(error, trace)
    };
    tracing::trace!(error = %error, "raising error");
    panic::resume_unwind(Box::new(error))
}

/// Raises `err` if it is `Some`; does nothing for `None`.
#[inline(never)]
pub fn raise_if<E>(err: Option<E>)
where
    E: Into<BoxError>,
{
    if let Some(err) = err {
        raise_at(err, 1);
    }
}

/// Converts a payload caught from an unwind into a traced [`SharedError`].
///
/// Payloads that already are errors keep their identity; anything else
/// becomes a [`PanicError`]. If no layer of the result carries a trace, the
/// trace recorded by the panic hook is attached, or, without the hook, one
/// taken at the caller of this function. [`catch`], [`catch_result`], and
/// [`rec`] drop any trace left by a panic caught elsewhere before running
/// their closure, so only a panic inside that closure can supply one.
#[inline(never)]
pub fn recover_payload(payload: Box<dyn Any + Send>) -> SharedError {
    let pending = panic_hook::take_pending_trace();
    let error = payload_into_error(payload);
    if chain::has_trace(&*error) {
        return error;
    }
    let trace = match pending {
        Some(trace) => trace,
        None => Trace::capture(1),
    };
    attach_trace(error, trace)
}

fn payload_into_error(payload: Box<dyn Any + Send>) -> SharedError {
    let payload = match payload.downcast::<SharedError>() {
        Ok(shared) => return *shared,
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<TracedError>() {
        Ok(traced) => return Arc::new(*traced),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<Errs>() {
        Ok(errs) => return Arc::new(*errs),
        Err(payload) => payload,
    };
    match payload.downcast::<BoxError>() {
        Ok(boxed) => into_shared(*boxed),
        Err(payload) => Arc::new(PanicError::from_payload(payload)),
    }
}

fn attach_trace(error: SharedError, trace: Trace) -> SharedError {
    let traced = match error.downcast_ref::<TracedError>() {
        Some(inner) => inner.clone(),
        None => TracedError::from_cause(error),
    };
    Arc::new(traced.with_trace(trace))
}

/// Runs `f` and, if it unwinds, stores the converted failure in `out`.
///
/// `out` is left untouched when `f` returns normally. Returns true if a
/// failure was recovered.
///
/// # Examples
///
/// ```
/// use panic_rail::recover::rec;
///
/// let mut err = None;
/// rec(&mut err, || panic!("lost connection"));
/// assert_eq!(err.unwrap().to_string(), "panic: lost connection");
/// ```
#[inline(never)]
pub fn rec<F>(out: &mut Option<SharedError>, f: F) -> bool
where
    F: FnOnce(),
{
    panic_hook::clear_pending_trace();
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => false,
        Err(payload) => {
            *out = Some(recover_payload(payload));
            true
        },
    }
}

/// Runs `f`, returning its value or the converted failure if it unwinds.
#[inline(never)]
pub fn catch<F, T>(f: F) -> RailResult<T>
where
    F: FnOnce() -> T,
{
    panic_hook::clear_pending_trace();
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Ok(value),
        Err(payload) => Err(recover_payload(payload)),
    }
}

/// Like [`catch`] for a fallible `f`; a returned `Err` and an unwind end up
/// as the same error type.
///
/// A returned error is passed through as-is. Only unwinds get a trace
/// attached here.
#[inline(never)]
pub fn catch_result<F, T, E>(f: F) -> RailResult<T>
where
    F: FnOnce() -> Result<T, E>,
    E: Into<BoxError>,
{
    panic_hook::clear_pending_trace();
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(into_shared(err)),
        Err(payload) => Err(recover_payload(payload)),
    }
}

/// Multi-line report for a failure that reached the top of the program.
pub fn report_failure(err: &(dyn Error + 'static)) -> String {
    render_with_trace(err, &trace_config())
}

/// Runs a program's body and turns any failure into a report and exit code 1.
///
/// Installs the panic hook, then runs `f`. A returned error or an unwind is
/// logged at error level, printed to stderr with traces, and ends the
/// process. On success the value of `f` is returned.
///
/// ```no_run
/// use panic_rail::recover::{raise, run_main};
/// use panic_rail::TracedError;
///
/// fn main() {
///     run_main(|| {
///         let config = std::fs::read_to_string("app.toml")
///             .map_err(|e| TracedError::wrap(e, "reading app.toml"))?;
///         if config.is_empty() {
///             raise(TracedError::plain("app.toml is empty"));
///         }
///         Ok::<_, TracedError>(())
///     })
/// }
/// ```
pub fn run_main<F, T, E>(f: F) -> T
where
    F: FnOnce() -> Result<T, E>,
    E: Into<BoxError>,
{
    install_panic_hook();
    match catch_result(f) {
        Ok(value) => value,
        Err(error) => {
            tracing::error!(error = %error, "program failed");
            eprintln!("{}", report_failure(&*error));
            process::exit(1)
        },
    }
}
