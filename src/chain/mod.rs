//! Chain traversal that understands aggregates.
//!
//! `std::error::Error::source` exposes a single cause. An [`Errs`] aggregate
//! has several, so [`walk`] descends into every failed member of an aggregate
//! and follows `source()` for everything else. The `Is`/`As` style helpers
//! below are built on it.
//!
//! # Examples
//!
//! ```
//! use panic_rail::{chain, into_shared, Errs, TracedError};
//!
//! let timeout = into_shared(TracedError::plain("timeout"));
//! let errs: Errs = vec![
//!     Some(into_shared(TracedError::plain("refused"))),
//!     None,
//!     Some(into_shared(TracedError::wrap(timeout.clone(), "probe 3"))),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert!(chain::is(&errs, &*timeout));
//! assert_eq!(chain::count(&errs, |e| e.is::<TracedError>()), 3);
//! ```

use std::error::Error;
use std::ops::ControlFlow;
use std::sync::Arc;

use crate::types::{Errs, PanicError, SharedError, Trace, TracedError};

/// Visits `err` and every error below it, depth first, until `visit` breaks.
///
/// Members of an [`Errs`] are visited in slot order; the aggregate's own
/// `source()` is not followed separately.
pub fn walk<'a, F>(err: &'a (dyn Error + 'static), visit: &mut F) -> ControlFlow<()>
where
    F: FnMut(&'a (dyn Error + 'static)) -> ControlFlow<()>,
{
    if visit(err).is_break() {
        return ControlFlow::Break(());
    }
    if let Some(errs) = err.downcast_ref::<Errs>() {
        for member in errs.errors() {
            if walk(&**member, visit).is_break() {
                return ControlFlow::Break(());
            }
        }
        return ControlFlow::Continue(());
    }
    match err.source() {
        Some(source) => walk(source, visit),
        None => ControlFlow::Continue(()),
    }
}

/// True if `pred` holds for any error in the chain.
pub fn any<F>(err: &(dyn Error + 'static), mut pred: F) -> bool
where
    F: FnMut(&(dyn Error + 'static)) -> bool,
{
    walk(err, &mut |e| if pred(e) { ControlFlow::Break(()) } else { ControlFlow::Continue(()) })
        .is_break()
}

/// Number of errors in the chain for which `pred` holds.
pub fn count<F>(err: &(dyn Error + 'static), mut pred: F) -> usize
where
    F: FnMut(&(dyn Error + 'static)) -> bool,
{
    let mut hits = 0;
    let _ = walk(err, &mut |e| {
        if pred(e) {
            hits += 1;
        }
        ControlFlow::Continue(())
    });
    hits
}

/// The first error of type `T` in the chain.
pub fn find<'a, T>(err: &'a (dyn Error + 'static)) -> Option<&'a T>
where
    T: Error + 'static,
{
    let mut found = None;
    let _ = walk(err, &mut |e| match e.downcast_ref::<T>() {
        Some(hit) => {
            found = Some(hit);
            ControlFlow::Break(())
        },
        None => ControlFlow::Continue(()),
    });
    found
}

/// True if `target` appears anywhere in the chain (see [`same_error`]).
///
/// A [`TracedError`] target also matches a layer with the same message whose
/// cause chain contains the target's cause, so extra wrapping below the
/// message does not hide it.
pub fn is(err: &(dyn Error + 'static), target: &(dyn Error + 'static)) -> bool {
    let traced_target = target.downcast_ref::<TracedError>();
    any(err, |e| {
        same_error(e, target) || traced_target.is_some_and(|target| unwraps_to(e, target))
    })
}

fn unwraps_to(layer: &(dyn Error + 'static), target: &TracedError) -> bool {
    let Some(layer) = layer.downcast_ref::<TracedError>() else {
        return false;
    };
    if layer.msg() != target.msg() {
        return false;
    }
    match (layer.cause(), target.cause()) {
        (Some(cause), Some(wanted)) => is(&**cause, &**wanted),
        _ => false,
    }
}

/// True if some layer of the chain carries a non-empty trace.
pub fn has_trace(err: &(dyn Error + 'static)) -> bool {
    any(err, |e| {
        e.downcast_ref::<TracedError>()
            .and_then(TracedError::trace)
            .is_some_and(|trace| !trace.is_empty())
    })
}

/// Every non-empty trace in the chain, outermost first.
pub fn traces<'a>(err: &'a (dyn Error + 'static)) -> Vec<&'a Trace> {
    let mut found = Vec::new();
    let _ = walk(err, &mut |e| {
        if let Some(trace) = e.downcast_ref::<TracedError>().and_then(TracedError::trace) {
            if !trace.is_empty() {
                found.push(trace);
            }
        }
        ControlFlow::Continue(())
    });
    found
}

/// Follows `source()` to the last error. Does not descend into aggregates.
pub fn root_cause<'a>(err: &'a (dyn Error + 'static)) -> &'a (dyn Error + 'static) {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current
}

/// Identity, or structural equality for this crate's own error types.
///
/// Two foreign errors are equal only if they are the same allocation.
pub fn same_error(lhs: &(dyn Error + 'static), rhs: &(dyn Error + 'static)) -> bool {
    if std::ptr::addr_eq(lhs, rhs) {
        return true;
    }
    if let (Some(lhs), Some(rhs)) =
        (lhs.downcast_ref::<TracedError>(), rhs.downcast_ref::<TracedError>())
    {
        return lhs == rhs;
    }
    if let (Some(lhs), Some(rhs)) = (lhs.downcast_ref::<Errs>(), rhs.downcast_ref::<Errs>()) {
        return lhs == rhs;
    }
    if let (Some(lhs), Some(rhs)) =
        (lhs.downcast_ref::<PanicError>(), rhs.downcast_ref::<PanicError>())
    {
        return lhs == rhs;
    }
    false
}

/// [`same_error`] for two shared errors.
pub fn same_shared(lhs: &SharedError, rhs: &SharedError) -> bool {
    Arc::ptr_eq(lhs, rhs) || same_error(&**lhs, &**rhs)
}

/// [`is`] over an optional subject; `None` contains nothing.
pub fn is_opt(err: Option<&SharedError>, target: &(dyn Error + 'static)) -> bool {
    err.is_some_and(|err| is(&**err, target))
}

/// [`find`] over an optional subject.
pub fn find_opt<T>(err: Option<&SharedError>) -> Option<&T>
where
    T: Error + 'static,
{
    err.and_then(|err| find::<T>(&**err))
}

/// [`any`] over an optional subject.
pub fn any_opt<F>(err: Option<&SharedError>, pred: F) -> bool
where
    F: FnMut(&(dyn Error + 'static)) -> bool,
{
    err.is_some_and(|err| any(&**err, pred))
}

/// [`has_trace`] over an optional subject.
pub fn has_trace_opt(err: Option<&SharedError>) -> bool {
    err.is_some_and(|err| has_trace(&**err))
}
