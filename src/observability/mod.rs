//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, stderr)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → Terminal / log capture
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Logs go to stderr so the UI on stdout is never interleaved with them
//! - Each session carries a session ID span field
//! - Metrics are cheap no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
