//! Ordered aggregate of per-task outcomes.
//!
//! An [`Errs`] holds one slot per submitted task; `None` marks a task that
//! succeeded. Always hand an aggregate to callers through
//! [`collapse`](Errs::collapse) or [`into_result`](Errs::into_result), never as
//! a bare error: an aggregate with zero failures is not an error.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::chain;
use crate::types::report::render_with_trace;
use crate::types::trace_config::trace_config;
use crate::types::{ErrorVec, SharedError};

/// One optional error per task, in submission order.
///
/// # Examples
///
/// ```
/// use panic_rail::{into_shared, Errs, TracedError};
///
/// let mut errs = Errs::new();
/// errs.push(None);
/// errs.push(Some(into_shared(TracedError::plain("disk full"))));
/// errs.push(None);
///
/// assert_eq!(errs.len(), 3);
/// assert_eq!(errs.failed(), 1);
///
/// // a single failure collapses to that failure, not to the aggregate
/// let err = errs.collapse().unwrap();
/// assert_eq!(err.to_string(), "disk full");
/// ```
#[derive(Clone, Default)]
pub struct Errs {
    errors: ErrorVec<Option<SharedError>>,
}

impl Errs {
    #[inline]
    pub fn new() -> Self {
        Self { errors: ErrorVec::new() }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { errors: ErrorVec::with_capacity(capacity) }
    }

    /// `len` empty (successful) slots.
    pub fn with_len(len: usize) -> Self {
        Self { errors: ErrorVec::from_elem(None, len) }
    }

    #[inline]
    pub fn push(&mut self, error: Option<SharedError>) {
        self.errors.push(error);
    }

    /// Overwrites slot `index`. Returns false if the slot does not exist.
    pub fn set(&mut self, index: usize, error: Option<SharedError>) -> bool {
        match self.errors.get_mut(index) {
            Some(slot) => {
                *slot = error;
                true
            },
            None => false,
        }
    }

    /// Number of slots, failed or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The error in slot `index`, if that task failed.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&SharedError> {
        self.errors.get(index).and_then(Option::as_ref)
    }

    /// Every slot in order.
    pub fn iter(&self) -> impl Iterator<Item = Option<&SharedError>> + '_ {
        self.errors.iter().map(Option::as_ref)
    }

    /// Only the failed slots, in order.
    pub fn errors(&self) -> impl Iterator<Item = &SharedError> + '_ {
        self.errors.iter().flatten()
    }

    /// Number of failed slots.
    pub fn failed(&self) -> usize {
        self.errors().count()
    }

    /// True when no slot holds an error.
    pub fn all_ok(&self) -> bool {
        self.errors.iter().all(Option::is_none)
    }

    /// Zero failures: `None`. One failure: that error itself. More: the aggregate.
    pub fn collapse(self) -> Option<SharedError> {
        match self.failed() {
            0 => None,
            1 => self.errors.into_iter().flatten().next(),
            _ => Some(Arc::new(self)),
        }
    }

    /// [`collapse`](Self::collapse) as a `Result`.
    pub fn into_result(self) -> Result<(), SharedError> {
        match self.collapse() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    #[inline]
    pub fn into_inner(self) -> ErrorVec<Option<SharedError>> {
        self.errors
    }
}

impl fmt::Display for Errs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return f.write_str(&render_with_trace(self, &trace_config()));
        }
        write!(f, "{} errors: ", self.failed())?;
        for (i, error) in self.errors().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Errs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.errors.iter()).finish()
    }
}

impl Error for Errs {
    /// The first failure. Use [`chain::walk`] to visit every member.
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.errors().next().map(|error| &**error as &(dyn Error + 'static))
    }
}

impl PartialEq for Errs {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().zip(other.iter()).all(|pair| match pair {
                (Some(lhs), Some(rhs)) => chain::same_error(&**lhs, &**rhs),
                (None, None) => true,
                _ => false,
            })
    }
}

impl FromIterator<Option<SharedError>> for Errs {
    fn from_iter<I: IntoIterator<Item = Option<SharedError>>>(iter: I) -> Self {
        Self { errors: iter.into_iter().collect() }
    }
}

impl IntoIterator for Errs {
    type Item = Option<SharedError>;
    type IntoIter = smallvec::IntoIter<[Option<SharedError>; 1]>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl From<ErrorVec<Option<SharedError>>> for Errs {
    fn from(errors: ErrorVec<Option<SharedError>>) -> Self {
        Self { errors }
    }
}
