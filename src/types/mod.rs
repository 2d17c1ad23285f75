//! Error types and utilities.
//!
//! This module provides the value types the rest of the crate is built on:
//!
//! - [`Trace`] / [`Caller`] / [`Frame`]: a cheap call-stack snapshot that is resolved lazily
//! - [`TraceConfig`]: process-wide rendering toggles for traces
//! - [`TracedError`]: message + optional cause + optional trace
//! - [`Errs`]: an ordered aggregate of per-task outcomes with collapse semantics
//! - [`PanicError`]: a panic payload that was not an error value
//!
//! # Examples
//!
//! ```
//! use panic_rail::{Errs, TracedError};
//!
//! let err = TracedError::wrap(std::io::Error::other("disk full"), "saving snapshot");
//! assert_eq!(err.to_string(), "saving snapshot: disk full");
//!
//! let errs: Errs = vec![None, Some(panic_rail::into_shared(err))].into_iter().collect();
//! assert_eq!(errs.failed(), 1);
//! ```
use std::error::Error;
use std::sync::Arc;

use smallvec::SmallVec;

pub mod errs;
pub mod panic_error;
pub mod report;
pub mod trace;
pub mod trace_config;
pub mod traced_error;

pub use errs::Errs;
pub use panic_error::PanicError;
pub use report::render_with_trace;
pub use trace::{Caller, Frame, Trace};
pub use trace_config::{set_trace_config, trace_config, TraceConfig};
pub use traced_error::{wrap, TracedError};

/// SmallVec-backed collection used for accumulating per-task errors.
///
/// Uses inline storage for a single element, which covers the common
/// one-task and all-succeeded cases without a heap allocation.
pub type ErrorVec<E> = SmallVec<[E; 1]>;

/// Owned, type-erased error accepted at every input boundary.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Shared, type-erased error value produced by every conversion in this crate.
///
/// Cloning is a reference-count bump, so one failure can be the cause of
/// several wrappers at once.
pub type SharedError = Arc<dyn Error + Send + Sync + 'static>;

/// Result alias whose failure side is a [`SharedError`].
pub type RailResult<T> = Result<T, SharedError>;

/// Converts any boxable error into a [`SharedError`].
///
/// An error that already is a `SharedError` is returned as-is instead of
/// being boxed a second time, so downcasting keeps working.
///
/// # Examples
///
/// ```
/// use panic_rail::{into_shared, TracedError};
///
/// let shared = into_shared(TracedError::plain("boom"));
/// let again = into_shared(shared.clone());
/// assert!(std::sync::Arc::ptr_eq(&shared, &again));
/// assert!(again.downcast_ref::<TracedError>().is_some());
/// ```
pub fn into_shared<E>(error: E) -> SharedError
where
    E: Into<BoxError>,
{
    let boxed: BoxError = error.into();
    match boxed.downcast::<SharedError>() {
        Ok(shared) => *shared,
        Err(boxed) => Arc::from(boxed),
    }
}
