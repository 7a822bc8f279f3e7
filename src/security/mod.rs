//! Abuse protection.
//!
//! # Data Flow
//! ```text
//! Query containing '+':
//!     → client IP (X-Forwarded-For or peer address)
//!     → rate_limit.rs (per-IP minute/hour/day windows)
//!     → allowed, or 429 with the denial reason
//! ```

pub mod rate_limit;

pub use rate_limit::{QueryLimits, RateGate};
