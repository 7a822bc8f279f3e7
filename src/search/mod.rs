//! Keyword search subsystem.
//!
//! # Data Flow
//! ```text
//! "dir/~kw1~kw2/ib"
//!     → options.rs (flag string → SearchOptions, once per call)
//!     → engine.rs (scope by directory, resolve each topic)
//!     → matcher.rs (all keywords present?)
//!     → ordered answers, LIMITED sentinel past the cap
//! ```

pub mod engine;
pub mod matcher;
pub mod options;

pub use engine::SearchEngine;
pub use matcher::matches;
pub use options::SearchOptions;
