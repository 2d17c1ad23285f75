//! Extension traits over `Result` values and error chains.
//!
//! - [`ResultExt`]: wrap the error side of a `Result` with a message, or raise it
//! - [`ErrorChainExt`]: `Is`/`As` style queries on [`SharedError`](crate::SharedError),
//!   `Option<SharedError>`, [`TracedError`](crate::TracedError), and [`Errs`](crate::Errs)
//!
//! # Examples
//!
//! ```
//! use panic_rail::traits::{ErrorChainExt, ResultExt};
//!
//! let result: Result<(), std::io::Error> = Err(std::io::Error::other("denied"));
//! let err = result.wrap_err("opening socket").unwrap_err();
//! assert!(err.find_cause::<std::io::Error>().is_some());
//! ```

pub mod error_chain;
pub mod result_ext;

pub use error_chain::ErrorChainExt;
pub use result_ext::ResultExt;
