//! Asynchronous exit waiting with cooperative cancellation.
//!
//! [`wait_for_exit`] turns a [`ProcessHandle`] into a single-completion
//! future. The future commits to exactly one terminal state: whichever of
//! {exit notification, cancellation} is delivered first wins, and the
//! loser's delivery is discarded rather than surfaced as an error.

use crate::cancel::CancellationToken;
use crate::handle::ProcessHandle;
use futures::future::BoxFuture;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Terminal state of an [`ExitSignal`]. Exactly one is ever produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The process exited while the wait was in progress.
    Completed,
    /// The cancellation signal fired before the process exited.
    Canceled,
    /// The process had already exited when the wait was requested.
    AlreadyExited,
}

impl WaitOutcome {
    /// True for the outcomes that mean the process is gone.
    pub fn exited(&self) -> bool {
        matches!(self, WaitOutcome::Completed | WaitOutcome::AlreadyExited)
    }
}

/// Single-completion future resolving to a [`WaitOutcome`].
///
/// Created by [`wait_for_exit`]. Either ready at creation (the process was
/// already gone) or pending until the first of exit and cancellation is
/// delivered.
pub struct ExitSignal {
    inner: Inner,
}

enum Inner {
    Ready(WaitOutcome),
    Waiting(BoxFuture<'static, WaitOutcome>),
    Done,
}

impl ExitSignal {
    fn ready(outcome: WaitOutcome) -> Self {
        Self {
            inner: Inner::Ready(outcome),
        }
    }

    fn waiting(fut: BoxFuture<'static, WaitOutcome>) -> Self {
        Self {
            inner: Inner::Waiting(fut),
        }
    }

    /// Whether the signal completed synchronously at creation.
    ///
    /// Awaiting a ready signal yields its outcome without suspending.
    pub fn is_ready(&self) -> bool {
        matches!(self.inner, Inner::Ready(_))
    }
}

impl Future for ExitSignal {
    type Output = WaitOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match &mut this.inner {
            Inner::Ready(outcome) => {
                let outcome = *outcome;
                this.inner = Inner::Done;
                Poll::Ready(outcome)
            }
            Inner::Waiting(fut) => match fut.as_mut().poll(cx) {
                Poll::Ready(outcome) => {
                    this.inner = Inner::Done;
                    Poll::Ready(outcome)
                }
                Poll::Pending => Poll::Pending,
            },
            Inner::Done => panic!("ExitSignal polled after completion"),
        }
    }
}

/// Wait for the handle's process to exit, with optional cooperative
/// cancellation.
///
/// Returns a signal that:
/// - is already complete with [`WaitOutcome::AlreadyExited`] if the process
///   was gone when the call was made (no subscription is made, so nothing
///   leaks on a dead process),
/// - resolves to [`WaitOutcome::Completed`] when the exit notification is
///   delivered,
/// - resolves to [`WaitOutcome::Canceled`] if `cancel` fires first.
///
/// Cancellation affects only the wait, never the underlying process, which
/// keeps running regardless. The handle must outlive the returned signal's
/// use of it only in the sense that its notifier does; a torn-down notifier
/// resolves the wait as completed rather than hanging it.
pub fn wait_for_exit<H>(handle: &H, cancel: Option<&CancellationToken>) -> ExitSignal
where
    H: ProcessHandle + ?Sized,
{
    // Fast path: no subscription on a process that is already gone.
    if handle.has_exited() {
        return ExitSignal::ready(WaitOutcome::AlreadyExited);
    }

    handle.enable_exit_notification();
    let mut exit_rx = handle.exit_notified();

    // The process may have exited between the first check and the
    // subscription. The channel stores the exit, so the subscription would
    // still observe it, but resolving here keeps the fast case synchronous.
    if handle.has_exited() {
        return ExitSignal::ready(WaitOutcome::Completed);
    }

    let cancel = cancel.cloned();
    ExitSignal::waiting(Box::pin(async move {
        let cancelled = async {
            match cancel {
                Some(token) => token.cancelled().await,
                // No token supplied: this arm never resolves.
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            // A closed channel means the handle was torn down mid-wait; the
            // process is unobservable either way, treat it as exited.
            _ = exit_rx.wait_for(|exited| *exited) => WaitOutcome::Completed,
            _ = cancelled => WaitOutcome::Canceled,
        }
    }))
}
