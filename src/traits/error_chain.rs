//! Chain queries as methods on the error holders this crate hands out.
//!
//! Every method treats an absent error (`None`) as an empty chain: queries
//! answer `false` or `None` instead of failing.

use std::error::Error;

use crate::chain;
use crate::types::{Errs, SharedError, TracedError};

/// `Is`/`As` style queries over an error chain, aggregates included.
///
/// # Examples
///
/// ```
/// use panic_rail::traits::ErrorChainExt;
/// use panic_rail::{into_shared, SharedError, TracedError};
///
/// let io = into_shared(std::io::Error::other("reset by peer"));
/// let err = Some(into_shared(TracedError::wrap(io.clone(), "sync")));
///
/// assert!(err.has_cause(&*io));
/// assert!(err.find_cause::<std::io::Error>().is_some());
/// assert!(err.is_traced());
///
/// let none: Option<SharedError> = None;
/// assert!(!none.is_traced());
/// ```
pub trait ErrorChainExt {
    /// The error at the top of the chain, if there is one.
    fn subject(&self) -> Option<&(dyn Error + 'static)>;

    /// The first error of type `T` anywhere in the chain.
    fn find_cause<T>(&self) -> Option<&T>
    where
        T: Error + 'static,
    {
        self.subject().and_then(chain::find::<T>)
    }

    /// True if `target` appears in the chain (see [`chain::same_error`]).
    fn has_cause(&self, target: &(dyn Error + 'static)) -> bool {
        self.subject().is_some_and(|subject| chain::is(subject, target))
    }

    /// True if any layer of the chain carries a trace.
    fn is_traced(&self) -> bool {
        self.subject().is_some_and(chain::has_trace)
    }

    /// Number of errors visited by [`chain::walk`], aggregates expanded.
    fn chain_len(&self) -> usize {
        self.subject().map_or(0, |subject| chain::count(subject, |_| true))
    }
}

impl ErrorChainExt for SharedError {
    fn subject(&self) -> Option<&(dyn Error + 'static)> {
        Some(&**self)
    }
}

impl ErrorChainExt for Option<SharedError> {
    fn subject(&self) -> Option<&(dyn Error + 'static)> {
        self.as_deref().map(|error| error as &(dyn Error + 'static))
    }
}

impl ErrorChainExt for TracedError {
    fn subject(&self) -> Option<&(dyn Error + 'static)> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

impl ErrorChainExt for Errs {
    fn subject(&self) -> Option<&(dyn Error + 'static)> {
        if self.all_ok() {
            None
        } else {
            Some(self)
        }
    }
}
