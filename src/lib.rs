//! Panic-safe concurrent execution with traced, structured errors.
//!
//! The crate is built from four layers, each usable on its own:
//!
//! - [`types`]: [`Trace`] snapshots that are cheap to capture and resolved only
//!   when printed, the structured [`TracedError`], and the per-task aggregate
//!   [`Errs`] with its collapse rule
//! - [`chain`]: traversal that follows causes through aggregates
//! - [`recover`]: conversion between unwinding and error values (`raise` and
//!   `catch`), plus a top-level [`run_main`](recover::run_main) hook
//! - [`conc`]: thread-per-task runners that isolate every task's failure, either
//!   waiting for all tasks or racing them with cooperative cancellation
//!
//! Each submodule re-exports its public surface from here.
//!
//! # Examples
//!
//! ## Wrapping errors
//!
//! ```
//! use panic_rail::{chain, TracedError};
//!
//! let refused = TracedError::new("connection refused");
//! let err = TracedError::wrap(TracedError::wrap(refused, "opening pool"), "loading user 42");
//!
//! assert_eq!(err.to_string(), "loading user 42: opening pool: connection refused");
//! // only the innermost layer took a trace
//! assert_eq!(chain::traces(&err).len(), 1);
//! ```
//!
//! ## Running tasks concurrently
//!
//! ```
//! use panic_rail::conc::conc_map_errs;
//!
//! let (parsed, errs) = conc_map_errs(["1", "two", "3"], |s: &str| s.parse::<u32>());
//!
//! assert_eq!(parsed, vec![1, 0, 3]);
//! assert_eq!(errs.len(), 3);
//! assert_eq!(errs.failed(), 1);
//! ```
//!
//! ## Raising and catching
//!
//! ```
//! use panic_rail::recover::catch;
//! use panic_rail::raise;
//!
//! let err = catch(|| -> u32 { raise!("quota exceeded for {}", "tenant-7") }).unwrap_err();
//! assert_eq!(err.to_string(), "quota exceeded for tenant-7");
//! ```

/// Chain traversal through causes and aggregates
pub mod chain;
/// Concurrent runners with per-task failure isolation
pub mod conc;
/// Formatting macros for building and raising errors
pub mod macros;
/// Convenience re-exports for quick starts
pub mod prelude;
/// Conversion between unwinding and error values
pub mod recover;
/// Extension traits over results and error chains
pub mod traits;
/// Trace, TracedError, Errs, and PanicError
pub mod types;

/// Async runners and panic-catching futures (requires `async-tokio` feature)
#[cfg(feature = "async-tokio")]
pub mod async_ext;

pub use recover::{catch, catch_result, raise, raise_at, raise_if, rec, recover_payload};
pub use traits::*;
pub use types::{
    into_shared, set_trace_config, trace_config, wrap, BoxError, Caller, ErrorVec, Errs, Frame,
    PanicError, RailResult, SharedError, Trace, TraceConfig, TracedError,
};
