//! Convenience re-exports for common usage patterns.
//!
//! ```
//! use panic_rail::prelude::*;
//! ```
//!
//! # What's Included
//!
//! - **Macros**: [`traced!`], [`wrap!`], [`raise!`], [`ensure!`]
//! - **Types**: [`TracedError`], [`Errs`], [`SharedError`], [`RailResult`], [`CancellationToken`]
//! - **Traits**: [`ResultExt`], [`ErrorChainExt`]
//! - **Functions**: the raise/catch pair and the concurrent runners
//!
//! # Examples
//!
//! ```
//! use panic_rail::prelude::*;
//!
//! fn fetch_all(ids: &[u32]) -> RailResult<Vec<String>> {
//!     conc_map(ids.iter().copied(), |id| {
//!         if id == 0 {
//!             return Err(traced!("invalid id {id}"));
//!         }
//!         Ok(format!("user-{id}"))
//!     })
//! }
//!
//! assert_eq!(fetch_all(&[1, 2]).unwrap(), ["user-1", "user-2"]);
//! assert!(fetch_all(&[1, 0]).unwrap_err().is_traced());
//! ```

// Macros
pub use crate::{ensure, raise, traced, wrap};

// Core types
pub use crate::types::{Errs, RailResult, SharedError, TracedError};

// Traits
pub use crate::traits::{ErrorChainExt, ResultExt};

// Protocol and runners
pub use crate::conc::{
    conc, conc_errs, conc_map, conc_map_errs, conc_map_or_raise, conc_or_raise, conc_race,
    conc_race_or_raise, conc_race_with, CancellationToken,
};
pub use crate::recover::{catch, catch_result, raise_if, rec, run_main};
