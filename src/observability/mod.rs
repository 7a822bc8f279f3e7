//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms)
//!
//! The request handler also writes:
//!     → audit.rs (one line per resolved query, append-only file)
//! ```

pub mod audit;
pub mod logging;
pub mod metrics;

pub use audit::QueryLog;
