//! Extension trait for wrapping and raising the error side of a `Result`.
//!
//! # Examples
//!
//! ```
//! use panic_rail::traits::ResultExt;
//!
//! fn load_config() -> Result<String, panic_rail::TracedError> {
//!     std::fs::read_to_string("does-not-exist.toml").wrap_err("loading configuration file")
//! }
//!
//! let err = load_config().unwrap_err();
//! assert!(err.to_string().starts_with("loading configuration file: "));
//! assert!(err.trace().is_some());
//! ```

use std::borrow::Cow;

use crate::recover::raise_at;
use crate::types::{BoxError, TracedError};

/// Wrapping and raising for any `Result` whose error converts into a
/// [`BoxError`].
///
/// Each method that captures a trace starts it at the caller of the method,
/// and only when the error chain has no trace yet.
pub trait ResultExt<T, E> {
    /// Wraps the error as the cause of a [`TracedError`] with `msg`.
    ///
    /// # Examples
    ///
    /// ```
    /// use panic_rail::traits::ResultExt;
    ///
    /// let result: Result<(), &str> = Err("timed out");
    /// let err = result.wrap_err("fetching manifest").unwrap_err();
    /// assert_eq!(err.to_string(), "fetching manifest: timed out");
    /// ```
    fn wrap_err(self, msg: impl Into<Cow<'static, str>>) -> Result<T, TracedError>;

    /// Like [`wrap_err`](Self::wrap_err); `f` only runs on the error path.
    fn wrap_err_with<F>(self, f: F) -> Result<T, TracedError>
    where
        F: FnOnce() -> String;

    /// Returns the value, or raises the error with a trace at the caller.
    ///
    /// # Examples
    ///
    /// ```
    /// use panic_rail::recover::catch;
    /// use panic_rail::traits::ResultExt;
    ///
    /// let port = catch(|| "8080".parse::<u16>().or_raise()).unwrap();
    /// assert_eq!(port, 8080);
    ///
    /// let err = catch(|| "http".parse::<u16>().or_raise()).unwrap_err();
    /// assert_eq!(err.to_string(), "invalid digit found in string");
    /// ```
    fn or_raise(self) -> T;
}

impl<T, E> ResultExt<T, E> for Result<T, E>
where
    E: Into<BoxError>,
{
    #[inline(never)]
    fn wrap_err(self, msg: impl Into<Cow<'static, str>>) -> Result<T, TracedError> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(TracedError::wrap_at(err, msg, 1)),
        }
    }

    #[inline(never)]
    fn wrap_err_with<F>(self, f: F) -> Result<T, TracedError>
    where
        F: FnOnce() -> String,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(TracedError::wrap_at(err, f(), 1)),
        }
    }

    #[inline(never)]
    fn or_raise(self) -> T {
        match self {
            Ok(value) => value,
            Err(err) => raise_at(err, 1),
        }
    }
}
