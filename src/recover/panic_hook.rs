//! Panic hook that remembers where the last panic on each thread happened.
//!
//! By the time `catch_unwind` returns, the panicking frames are gone. The hook
//! runs before unwinding starts, so it captures a [`Trace`] of the panic site
//! and parks it in a thread-local slot. [`recover_payload`](super::recover_payload)
//! takes it from there on the same thread.
//!
//! Errors raised through [`raise`](super::raise) unwind with
//! `resume_unwind`, which bypasses panic hooks; they carry their own trace.

use std::cell::RefCell;
use std::panic;
use std::sync::Once;

use crate::types::Trace;

thread_local! {
    static PENDING: RefCell<Option<Trace>> = const { RefCell::new(None) };
}

static INSTALL: Once = Once::new();

/// Installs the trace-recording hook. Later calls do nothing.
///
/// The previously installed hook still runs after the trace is recorded, so
/// panic messages keep being printed the usual way.
pub fn install_panic_hook() {
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let trace = Trace::capture(0);
            let _ = PENDING.try_with(|slot| slot.replace(Some(trace)));
            previous(info);
        }));
        tracing::debug!("panic trace hook installed");
    });
}

/// Returns true once [`install_panic_hook`] has run.
pub fn panic_hook_installed() -> bool {
    INSTALL.is_completed()
}

/// Drops a trace left behind by a panic that was caught elsewhere.
pub(crate) fn clear_pending_trace() {
    let _ = take_pending_trace();
}

/// Takes the trace recorded for the most recent panic on this thread.
pub(crate) fn take_pending_trace() -> Option<Trace> {
    PENDING.try_with(|slot| slot.borrow_mut().take()).ok().flatten()
}
