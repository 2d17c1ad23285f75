//! Async counterparts of the recovery protocol and the concurrent runners.
//!
//! # Feature Flag
//!
//! Requires the `async-tokio` feature:
//!
//! ```toml
//! [dependencies]
//! panic-rail = { version = "0.3", features = ["async-tokio"] }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use panic_rail::async_ext::conc_futures_map;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (sizes, errs) = conc_futures_map((1..=3u32).map(|n| async move {
//!     Ok::<_, std::io::Error>(n * 10)
//! }))
//! .await;
//!
//! assert_eq!(sizes, vec![10, 20, 30]);
//! assert!(errs.all_ok());
//! # }
//! ```

mod catch_panic;
mod conc;

pub use catch_panic::{CatchPanic, FutureRailExt};
pub use conc::{
    conc_futures, conc_futures_map, conc_race_futures, conc_race_futures_with,
};
