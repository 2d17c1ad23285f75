//! Structured error with a message, an optional cause, and an optional trace.
//!
//! [`TracedError`] is never mutated after construction: every `with_*` method
//! consumes the value and returns a new one. Causes are held as
//! [`SharedError`], so the same failure can sit under several wrappers.
//!
//! A trace is captured at most once per chain. [`TracedError::wrap`] and
//! [`TracedError::traced`] check the whole cause chain first and skip the
//! capture when any layer already carries a non-empty trace, which keeps the
//! trace pointing at the innermost wrap site.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::chain;
use crate::types::report::render_with_trace;
use crate::types::trace::Trace;
use crate::types::trace_config::{trace_config, TraceConfig};
use crate::types::{into_shared, BoxError, SharedError};

/// Error value carrying an optional message, cause, and trace.
///
/// # Examples
///
/// ```
/// use panic_rail::TracedError;
///
/// let root = TracedError::new("connection refused");
/// assert!(root.trace().is_some());
///
/// let wrapped = TracedError::wrap(root, "loading user 42");
/// assert_eq!(wrapped.to_string(), "loading user 42: connection refused");
/// // the cause already has a trace, so the wrapper does not take another one
/// assert!(wrapped.trace().is_none());
/// ```
#[must_use]
#[derive(Clone, Default)]
pub struct TracedError {
    msg: Option<Cow<'static, str>>,
    cause: Option<SharedError>,
    trace: Option<Arc<Trace>>,
}

impl TracedError {
    /// Creates an error with `msg` and a trace starting at the caller.
    #[inline(never)]
    pub fn new(msg: impl Into<Cow<'static, str>>) -> Self {
        Self { msg: non_empty(msg.into()), cause: None, trace: Some(Arc::new(Trace::capture(1))) }
    }

    /// Creates an error with `msg` and no trace.
    ///
    /// Useful for sentinel values compared with `==` or [`chain::is`].
    pub fn plain(msg: impl Into<Cow<'static, str>>) -> Self {
        Self { msg: non_empty(msg.into()), cause: None, trace: None }
    }

    /// Wraps `err` as the cause of a new error with `msg`.
    ///
    /// A trace starting at the caller is captured only if no error in the
    /// chain of `err` carries one yet.
    #[inline(never)]
    pub fn wrap<E>(err: E, msg: impl Into<Cow<'static, str>>) -> Self
    where
        E: Into<BoxError>,
    {
        Self::wrap_at(err, msg, 1)
    }

    /// Like [`wrap`](Self::wrap), skipping `skip` extra frames above the caller.
    #[inline(never)]
    pub fn wrap_at<E>(err: E, msg: impl Into<Cow<'static, str>>, skip: usize) -> Self
    where
        E: Into<BoxError>,
    {
        let cause = into_shared(err);
        let trace = if chain::has_trace(&*cause) {
            None
        } else {
            Some(Arc::new(Trace::capture(skip.saturating_add(1))))
        };
        Self { msg: non_empty(msg.into()), cause: Some(cause), trace }
    }

    /// An error whose only content is `err`; no message, no trace.
    pub fn from_cause<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self { msg: None, cause: Some(into_shared(err)), trace: None }
    }

    /// Returns a copy with the message replaced.
    pub fn with_msg(mut self, msg: impl Into<Cow<'static, str>>) -> Self {
        self.msg = non_empty(msg.into());
        self
    }

    /// Returns a copy with the cause replaced.
    pub fn with_cause<E>(mut self, err: E) -> Self
    where
        E: Into<BoxError>,
    {
        self.cause = Some(into_shared(err));
        self
    }

    /// Returns a copy carrying `trace`, replacing any trace of its own.
    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.trace = Some(Arc::new(trace));
        self
    }

    /// Attaches a trace starting at the caller unless the chain already has one.
    #[inline(never)]
    pub fn traced(self) -> Self {
        self.traced_at(1)
    }

    /// Like [`traced`](Self::traced), skipping `skip` extra frames above the caller.
    #[inline(never)]
    pub fn traced_at(self, skip: usize) -> Self {
        if chain::has_trace(&self) {
            return self;
        }
        self.with_trace(Trace::capture(skip.saturating_add(1)))
    }

    #[inline]
    pub fn msg(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    #[inline]
    pub fn cause(&self) -> Option<&SharedError> {
        self.cause.as_ref()
    }

    /// The trace held by this layer only; see [`chain::traces`] for the whole chain.
    #[inline]
    pub fn trace(&self) -> Option<&Trace> {
        self.trace.as_deref()
    }

    /// No message, no cause, no trace.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.msg.is_none() && self.cause.is_none() && self.trace.is_none()
    }

    /// `None` for the empty error, `Some(self)` otherwise.
    #[inline]
    pub fn into_option(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    /// Multi-line rendering with traces, using the process-wide configuration.
    #[must_use]
    pub fn render_with_trace(&self) -> String {
        render_with_trace(self, &trace_config())
    }

    /// Multi-line rendering with traces, using `config`.
    #[must_use]
    pub fn render_with_trace_config(&self, config: &TraceConfig) -> String {
        render_with_trace(self, config)
    }
}

/// Nil-safe wrap: `None` stays `None`.
///
/// # Examples
///
/// ```
/// use panic_rail::wrap;
///
/// assert!(wrap(None::<std::io::Error>, "reading config").is_none());
///
/// let err = wrap(Some(std::io::Error::other("denied")), "reading config");
/// assert_eq!(err.map(|e| e.to_string()).as_deref(), Some("reading config: denied"));
/// ```
#[inline(never)]
pub fn wrap<E>(err: Option<E>, msg: impl Into<Cow<'static, str>>) -> Option<TracedError>
where
    E: Into<BoxError>,
{
    match err {
        Some(err) => Some(TracedError::wrap_at(err, msg, 1)),
        None => None,
    }
}

fn non_empty(msg: Cow<'static, str>) -> Option<Cow<'static, str>> {
    if msg.is_empty() {
        None
    } else {
        Some(msg)
    }
}

impl fmt::Display for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return f.write_str(&self.render_with_trace());
        }
        match (&self.msg, &self.cause) {
            (Some(msg), Some(cause)) => write!(f, "{msg}: {cause}"),
            (Some(msg), None) => f.write_str(msg),
            (None, Some(cause)) => write!(f, "{cause}"),
            (None, None) => Ok(()),
        }
    }
}

impl fmt::Debug for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedError")
            .field("msg", &self.msg)
            .field("cause", &self.cause)
            .field("trace_depth", &self.trace.as_ref().map(|trace| trace.len()))
            .finish()
    }
}

impl Error for TracedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|cause| cause as &(dyn Error + 'static))
    }
}

impl PartialEq for TracedError {
    fn eq(&self, other: &Self) -> bool {
        self.msg == other.msg
            && match (&self.cause, &other.cause) {
                (Some(lhs), Some(rhs)) => chain::same_error(&**lhs, &**rhs),
                (None, None) => true,
                _ => false,
            }
    }
}

impl From<&'static str> for TracedError {
    fn from(msg: &'static str) -> Self {
        Self::plain(msg)
    }
}

impl From<String> for TracedError {
    fn from(msg: String) -> Self {
        Self::plain(msg)
    }
}
