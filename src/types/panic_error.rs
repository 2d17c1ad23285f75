//! Error wrapper for panic payloads that are not errors themselves.

use std::any::Any;
use std::fmt;
use std::sync::{Mutex, PoisonError};

const NON_STRING_PAYLOAD: &str = "panic with non-string payload";

/// A panic whose payload was an arbitrary value, e.g. `panic!("boom")`.
///
/// String payloads become the message. The original payload is kept and can
/// be taken back once with [`take_payload`](Self::take_payload).
pub struct PanicError {
    message: String,
    payload: Mutex<Option<Box<dyn Any + Send>>>,
}

impl PanicError {
    /// A panic error with a message and no payload.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), payload: Mutex::new(None) }
    }

    /// Wraps a payload obtained from `catch_unwind` or a join handle.
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = payload_message(payload.as_ref())
            .unwrap_or_else(|| NON_STRING_PAYLOAD.to_owned());
        Self { message, payload: Mutex::new(Some(payload)) }
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the original payload the first time it is called.
    pub fn take_payload(&self) -> Option<Box<dyn Any + Send>> {
        self.payload.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

/// Extracts the message from `&str` and `String` payloads.
pub(crate) fn payload_message(payload: &(dyn Any + Send)) -> Option<String> {
    payload
        .downcast_ref::<&'static str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
}

impl fmt::Display for PanicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panic: {}", self.message)
    }
}

impl fmt::Debug for PanicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanicError").field("message", &self.message).finish_non_exhaustive()
    }
}

impl std::error::Error for PanicError {}

impl PartialEq for PanicError {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
    }
}
