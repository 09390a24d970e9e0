//! Process handles: identity, exit status, and exit-notification delivery.
//!
//! A [`ProcessHandle`] is the caller-owned view of a process under
//! observation. It exposes the three facts the exit waiter needs: a stable
//! PID, a monotonic exited flag, and a terminal subscription point that
//! fires at most once when the process ends.

use crate::error::{ProcwatchError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::process::Child;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Caller-owned reference to a process under observation.
pub trait ProcessHandle: Send + Sync {
    /// The OS process identifier. Stable for the process lifetime.
    fn pid(&self) -> u32;

    /// Whether the process has already exited.
    ///
    /// Monotonic: once true, never reverts.
    fn has_exited(&self) -> bool;

    /// Switch on exit-notification delivery.
    ///
    /// One-way and idempotent; repeat calls are no-ops. An exit can only be
    /// observed through [`ProcessHandle::exit_notified`] after notification
    /// has been enabled.
    fn enable_exit_notification(&self);

    /// Terminal subscription point.
    ///
    /// The received value flips from `false` to `true` at most once, when
    /// the process exits. The channel stores the value, so subscribers that
    /// register after the exit still observe it.
    fn exit_notified(&self) -> watch::Receiver<bool>;
}

/// Handle over a child process spawned through [`tokio::process`].
///
/// The canonical [`ProcessHandle`] implementation. Adopting a [`Child`]
/// hands its wait side to the handle; once notification is enabled, a
/// background task reaps the child and fires the exit channel.
#[derive(Debug, Clone)]
pub struct ChildHandle {
    pid: u32,
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    exited: AtomicBool,
    notify_enabled: AtomicBool,
    exit_tx: watch::Sender<bool>,
    /// Present until the reaper task takes ownership of the wait side, or
    /// until a non-blocking poll observes the exit first.
    child: Mutex<Option<Child>>,
}

impl ChildHandle {
    /// Adopt a spawned child.
    ///
    /// Fails with [`ProcwatchError::MissingPid`] if the runtime has already
    /// reaped the child and its PID is gone.
    pub fn adopt(child: Child) -> Result<Self> {
        let pid = child.id().ok_or(ProcwatchError::MissingPid)?;
        let (exit_tx, _rx) = watch::channel(false);

        Ok(Self {
            pid,
            shared: Arc::new(Shared {
                exited: AtomicBool::new(false),
                notify_enabled: AtomicBool::new(false),
                exit_tx,
                child: Mutex::new(Some(child)),
            }),
        })
    }
}

impl Shared {
    /// Commit the exit: flag first, then the notification.
    ///
    /// `send_replace` updates the stored value even with no live
    /// subscribers, so a late `exit_notified()` still observes the exit.
    fn mark_exited(&self) {
        self.exited.store(true, Ordering::SeqCst);
        self.exit_tx.send_replace(true);
    }
}

impl ProcessHandle for ChildHandle {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn has_exited(&self) -> bool {
        if self.shared.exited.load(Ordering::SeqCst) {
            return true;
        }

        // While the wait side is still locally owned, poll it without
        // blocking so the flag stays accurate before notification has been
        // enabled.
        let mut guard = self.shared.child.lock().unwrap();
        if let Some(child) = guard.as_mut() {
            match child.try_wait() {
                Ok(Some(status)) => {
                    debug!("process {} exited with {}", self.pid, status);
                    *guard = None;
                    self.shared.mark_exited();
                    return true;
                }
                Ok(None) => {}
                Err(e) => warn!("try_wait for process {} failed: {}", self.pid, e),
            }
        }

        self.shared.exited.load(Ordering::SeqCst)
    }

    fn enable_exit_notification(&self) {
        if self.shared.notify_enabled.swap(true, Ordering::SeqCst) {
            return;
        }

        let taken = self.shared.child.lock().unwrap().take();
        let Some(mut child) = taken else {
            // A non-blocking poll already reaped the child; the flag and
            // channel are settled.
            return;
        };

        let shared = Arc::clone(&self.shared);
        let pid = self.pid;
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => debug!("process {} exited with {}", pid, status),
                Err(e) => warn!("wait for process {} failed: {}", pid, e),
            }
            shared.mark_exited();
        });
    }

    fn exit_notified(&self) -> watch::Receiver<bool> {
        self.shared.exit_tx.subscribe()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::process::Command;

    #[tokio::test]
    async fn test_adopt_running_child() {
        let child = Command::new("sleep").arg("30").spawn().expect("spawn sleep");
        let expected_pid = child.id().unwrap();

        let handle = ChildHandle::adopt(child).expect("adopt child");
        assert_eq!(handle.pid(), expected_pid);
        assert!(!handle.has_exited());

        // Cleanup: the wait side is still owned locally, kill it directly.
        let mut guard = handle.shared.child.lock().unwrap();
        if let Some(child) = guard.as_mut() {
            let _ = child.start_kill();
        }
    }

    #[tokio::test]
    async fn test_adopt_fails_after_reap() {
        let mut child = Command::new("true").spawn().expect("spawn true");
        child.wait().await.expect("wait for true");

        match ChildHandle::adopt(child) {
            Err(ProcwatchError::MissingPid) => {}
            other => panic!("expected MissingPid, got {:?}", other.map(|h| h.pid())),
        }
    }

    #[tokio::test]
    async fn test_has_exited_flips_once_without_notification() {
        let child = Command::new("true").spawn().expect("spawn true");
        let handle = ChildHandle::adopt(child).expect("adopt child");

        // `true` exits almost immediately; poll until the flag flips.
        for _ in 0..100 {
            if handle.has_exited() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(handle.has_exited());

        // Monotonic: still exited, and enabling notification afterwards
        // neither panics nor clears the flag.
        handle.enable_exit_notification();
        assert!(handle.has_exited());
        assert!(*handle.exit_notified().borrow());
    }

    #[tokio::test]
    async fn test_exit_notified_fires_after_enable() {
        let child = Command::new("sleep").arg("0.05").spawn().expect("spawn sleep");
        let handle = ChildHandle::adopt(child).expect("adopt child");

        handle.enable_exit_notification();
        // Idempotent; a second call must not spawn a second reaper.
        handle.enable_exit_notification();

        let mut rx = handle.exit_notified();
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|exited| *exited))
            .await
            .expect("exit notification within bounded delay")
            .expect("notifier alive until exit");
        assert!(handle.has_exited());
    }
}
