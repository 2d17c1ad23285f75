//! Formatting shortcuts for building, wrapping, and raising errors.
//!
//! - [`macro@crate::traced`] - a [`TracedError`](crate::TracedError) with a formatted message
//!   and a trace starting at the macro call.
//! - [`macro@crate::wrap`] - nil-safe wrap with a formatted message.
//! - [`macro@crate::raise`] - raises a formatted message as an error.
//! - [`macro@crate::ensure`] - raises when a condition does not hold.
//!
//! Formatting happens only when an error is actually built.
//!
//! # Examples
//!
//! ```
//! use panic_rail::recover::catch;
//! use panic_rail::{ensure, traced, wrap};
//!
//! let err = traced!("user {} not found", 42);
//! assert_eq!(err.to_string(), "user 42 not found");
//!
//! let none = wrap!(None::<std::io::Error>, "reading {}", "app.toml");
//! assert!(none.is_none());
//!
//! let shards = 0;
//! let err = catch(|| ensure!(shards > 0, "need at least one shard, got {}", shards)).unwrap_err();
//! assert_eq!(err.to_string(), "need at least one shard, got 0");
//! ```

/// Creates a [`TracedError`](crate::TracedError) with a formatted message and
/// a trace starting at the macro call.
///
/// # Examples
///
/// ```
/// use panic_rail::traced;
///
/// let shard = 3;
/// let err = traced!("shard {shard} is read-only");
/// assert_eq!(err.msg(), Some("shard 3 is read-only"));
/// assert!(err.trace().is_some());
/// ```
#[macro_export]
macro_rules! traced {
    ($($arg:tt)+) => {
        $crate::TracedError::new(::std::format!($($arg)+))
    };
}

/// Wraps an `Option` of an error with a formatted message; `None` stays `None`
/// and the message is never formatted.
///
/// # Examples
///
/// ```
/// use panic_rail::wrap;
///
/// let denied = Some(std::io::Error::other("denied"));
/// let err = wrap!(denied, "opening {}", "/var/run/app.sock").unwrap();
/// assert_eq!(err.to_string(), "opening /var/run/app.sock: denied");
/// ```
#[macro_export]
macro_rules! wrap {
    ($err:expr, $($arg:tt)+) => {
        match $err {
            ::std::option::Option::Some(err) => ::std::option::Option::Some(
                $crate::TracedError::wrap_at(err, ::std::format!($($arg)+), 0),
            ),
            ::std::option::Option::None => ::std::option::Option::None,
        }
    };
}

/// Raises a [`TracedError`](crate::TracedError) with a formatted message and a
/// trace starting at the macro call.
///
/// # Examples
///
/// ```
/// use panic_rail::raise;
/// use panic_rail::recover::catch;
///
/// let err = catch(|| -> u32 { raise!("bucket {} missing", "logs") }).unwrap_err();
/// assert_eq!(err.to_string(), "bucket logs missing");
/// ```
#[macro_export]
macro_rules! raise {
    ($($arg:tt)+) => {
        $crate::recover::raise_at($crate::TracedError::plain(::std::format!($($arg)+)), 0)
    };
}

/// Raises a formatted error unless `cond` holds.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::raise!($($arg)+);
        }
    };
}
