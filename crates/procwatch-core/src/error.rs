//! Error types for Procwatch.
//!
//! The taxonomy is deliberately small. A process that cannot be found or
//! inspected is not an error: the command-line resolver reports it as an
//! absent value, because "exited already" and "insufficient privilege" are
//! externally indistinguishable for that query shape. Errors are reserved
//! for the query mechanism itself being unusable. The exit waiter has no
//! error kind at all; its outcomes are terminal future states.

use thiserror::Error;

/// Main error type for the procwatch library.
#[derive(Debug, Error)]
pub enum ProcwatchError {
    /// The OS process-table query mechanism cannot be reached on this
    /// platform. Never used for "queried successfully, found nothing".
    #[error("process table queries are not supported on this platform")]
    ProcessTableUnavailable,

    /// A child was adopted after the runtime had already reaped it, so its
    /// PID is no longer known.
    #[error("child process has no PID (already reaped)")]
    MissingPid,
}

/// Result type alias using ProcwatchError.
pub type Result<T> = std::result::Result<T, ProcwatchError>;
