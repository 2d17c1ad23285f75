//! Concurrent task runners with per-task failure isolation.
//!
//! Two contracts, picked by the caller:
//!
//! - plain mode ([`conc_errs`], [`conc`], [`conc_map`] and friends) waits for
//!   every task and reports every failure, in input order;
//! - race mode ([`conc_race`] and friends) returns at the first failure and
//!   cancels the rest through a shared [`CancellationToken`].
//!
//! In both modes each task runs on its own thread behind
//! [`catch_result`](crate::recover::catch_result), so a task that unwinds
//! never takes its siblings or the caller down with it. The `_or_raise`
//! variants re-raise the collapsed failure with a trace pointing at their
//! caller.
//!
//! # Examples
//!
//! ```
//! use panic_rail::conc::conc_map;
//!
//! let squares = conc_map(1..=4u64, |n| Ok::<_, std::io::Error>(n * n)).unwrap();
//! assert_eq!(squares, vec![1, 4, 9, 16]);
//! ```

mod plain;
mod race;

pub use plain::{conc, conc_errs, conc_map, conc_map_errs, conc_map_or_raise, conc_or_raise};
pub use race::{conc_race, conc_race_or_raise, conc_race_with};
pub use tokio_util::sync::CancellationToken;
