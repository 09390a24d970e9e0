//! Procwatch Core - OS process introspection primitives.
//!
//! This crate provides two leaf-level capabilities for a host application
//! observing an already-running process:
//!
//! - recover the full invocation command line of a process from its PID
//!   ([`command_line`], [`SystemProcessTable`])
//! - asynchronously await a process's termination with cooperative
//!   cancellation ([`wait_for_exit`], [`ExitSignal`])
//!
//! The crate only observes. It never spawns, signals, or redirects the
//! processes it looks at; cancelling a wait affects the waiter, not the
//! process.
//!
//! # Example
//!
//! ```rust,ignore
//! use procwatch_core::{command_line, wait_for_exit, CancellationToken, ChildHandle, ProcessHandle};
//!
//! #[tokio::main]
//! async fn main() -> procwatch_core::Result<()> {
//!     let child = tokio::process::Command::new("sleep").arg("5").spawn().unwrap();
//!     let handle = ChildHandle::adopt(child)?;
//!
//!     if let Some(cmdline) = command_line(handle.pid())? {
//!         println!("observing: {cmdline}");
//!     }
//!
//!     let token = CancellationToken::new();
//!     let outcome = wait_for_exit(&handle, Some(&token)).await;
//!     println!("wait finished: {outcome:?}");
//!
//!     Ok(())
//! }
//! ```

pub mod cancel;
pub mod cmdline;
pub mod error;
pub mod handle;
pub mod wait;

// Re-export commonly used types
pub use cancel::CancellationToken;
pub use cmdline::{command_line, ProcessMetadataSource, SystemProcessTable};
pub use error::{ProcwatchError, Result};
pub use handle::{ChildHandle, ProcessHandle};
pub use wait::{wait_for_exit, ExitSignal, WaitOutcome};
