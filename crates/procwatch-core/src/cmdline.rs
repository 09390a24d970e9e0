//! Command-line lookup from the OS process table.
//!
//! Recovers the full invocation command line the OS recorded for a process
//! at launch, given only its PID. A lookup is a single point-in-time
//! snapshot query: the process table is inherently racy, and a failed
//! lookup is not usefully retryable.

use crate::error::{ProcwatchError, Result};
use std::sync::Mutex;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use tracing::debug;

/// Read-only source of process metadata, keyed by PID.
///
/// Capability seam over the platform's process-information table. Platforms
/// without a usable table report `is_available() == false` and fail lookups
/// outright instead of reporting absent command lines.
pub trait ProcessMetadataSource: Send + Sync {
    /// Whether the underlying query mechanism is usable at all.
    fn is_available(&self) -> bool;

    /// Look up the command line recorded for `pid`.
    ///
    /// Returns `Ok(None)` when no live process matches the PID, or when a
    /// matching record carries no readable command line. Both happen for
    /// ordinary reasons (the process exited between PID capture and query,
    /// or the caller lacks privilege to inspect it) and the two causes are
    /// externally indistinguishable, so they are deliberately not
    /// separated. This is a best-effort lookup, not an existence check.
    fn command_line(&self, pid: u32) -> Result<Option<String>>;
}

/// Production metadata source backed by [`sysinfo::System`].
///
/// Holds the process table behind a mutex; each lookup refreshes exactly
/// the requested PID and releases everything before returning.
#[derive(Debug)]
pub struct SystemProcessTable {
    system: Mutex<System>,
}

impl SystemProcessTable {
    /// Create a metadata source with an empty process table.
    ///
    /// Nothing is read from the OS until the first lookup.
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for SystemProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessMetadataSource for SystemProcessTable {
    fn is_available(&self) -> bool {
        sysinfo::IS_SUPPORTED_SYSTEM
    }

    fn command_line(&self, pid: u32) -> Result<Option<String>> {
        if !self.is_available() {
            return Err(ProcwatchError::ProcessTableUnavailable);
        }

        let pid = Pid::from_u32(pid);
        let mut system = self.system.lock().unwrap();

        // Refresh only the requested PID. PIDs are unique among live
        // processes, so this yields at most one record.
        let refreshed = system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::new().with_cmd(UpdateKind::Always),
        );

        if refreshed == 0 {
            debug!("no process table record for PID {}", pid);
            return Ok(None);
        }

        let cmdline = system.process(pid).map(|process| {
            process
                .cmd()
                .iter()
                .map(|arg| arg.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        });

        // A record with an empty command line means the metadata is not
        // readable: the process exited mid-query or we lack privilege.
        Ok(cmdline.filter(|cmdline| !cmdline.is_empty()))
    }
}

/// Look up the command line for `pid` with a one-shot process table query.
///
/// Builds a fresh [`SystemProcessTable`] for a single query. Callers doing
/// repeated lookups should hold on to a [`SystemProcessTable`] instead.
pub fn command_line(pid: u32) -> Result<Option<String>> {
    SystemProcessTable::new().command_line(pid)
}
