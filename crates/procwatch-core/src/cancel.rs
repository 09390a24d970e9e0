//! Cancellation signal for async waits.
//!
//! This module provides a reusable `CancellationToken` that can be shared
//! across async tasks for cooperative cancellation. It is backed by a
//! `watch` channel rather than a bare atomic so that waiters can register
//! for the signal instead of polling it.

use std::sync::Arc;
use tokio::sync::watch;

/// A cancellation token for cooperative cancellation of async operations.
///
/// This token can be cloned and shared across tasks. When `cancel()` is
/// called on any clone, all clones will observe the cancellation.
/// Cancellation is signaling only; it never affects the process a waiter is
/// observing.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancellationToken {
    /// Create a new cancellation token.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Request cancellation.
    ///
    /// Idempotent. All clones of this token will observe the cancellation.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until cancellation is requested.
    ///
    /// Resolves immediately if the token is already cancelled, so late
    /// registration is safe.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives at least as long as this borrow, so the wait
        // cannot observe a closed channel.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Create a child token that shares cancellation state with this token.
    ///
    /// Cancelling either the parent or child will cancel both.
    pub fn child_token(&self) -> Self {
        self.clone()
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
