//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     quit command / signal → latched broadcast → UI loop and mint watcher exit
//!
//! Signals (signals.rs):
//!     SIGINT (Ctrl-C) / SIGTERM → trigger shutdown
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownSignal};
