//! Future wrapper that turns a panic during `poll` into an error value.

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use std::panic::{self, AssertUnwindSafe};

use pin_project_lite::pin_project;

use crate::recover::recover_payload;
use crate::types::RailResult;

pin_project! {
    /// Polls the inner future behind `catch_unwind`.
    ///
    /// Resolves to `Ok(output)` when the inner future completes, or to the
    /// converted failure when one of its polls unwinds. After an unwind the
    /// inner future is not polled again.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use panic_rail::async_ext::FutureRailExt;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let result: panic_rail::RailResult<()> =
    ///     async { panic!("decoder state corrupted") }.catch_panic().await;
    /// assert_eq!(result.unwrap_err().to_string(), "panic: decoder state corrupted");
    /// # }
    /// ```
    #[must_use = "futures do nothing unless polled"]
    pub struct CatchPanic<Fut> {
        #[pin]
        future: Fut,
        done: bool,
    }
}

impl<Fut> CatchPanic<Fut> {
    #[inline]
    pub fn new(future: Fut) -> Self {
        Self { future, done: false }
    }
}

impl<Fut: Future> Future for CatchPanic<Fut> {
    type Output = RailResult<Fut::Output>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        if *this.done {
            return Poll::Pending;
        }
        let future = this.future;
        match panic::catch_unwind(AssertUnwindSafe(|| future.poll(cx))) {
            Ok(Poll::Ready(output)) => {
                *this.done = true;
                Poll::Ready(Ok(output))
            },
            Ok(Poll::Pending) => Poll::Pending,
            Err(payload) => {
                *this.done = true;
                Poll::Ready(Err(recover_payload(payload)))
            },
        }
    }
}

/// Adds [`catch_panic`](FutureRailExt::catch_panic) to every future.
pub trait FutureRailExt: Future + Sized {
    /// Wraps the future in [`CatchPanic`].
    fn catch_panic(self) -> CatchPanic<Self> {
        CatchPanic::new(self)
    }
}

impl<Fut: Future> FutureRailExt for Fut {}
