//! Reverse proxy to the interactive shell service.
//!
//! # Data Flow
//! ```text
//! /:shell-x/<rest>?q=a b
//!     → upstream.rs (base + rest, q → arg=a&arg=b, drop Host)
//!     → relay.rs (single attempt, bounded by timeouts)
//!     → upstream status + body, hop-by-hop headers removed
//! ```

pub mod relay;
pub mod upstream;

pub use relay::{RelayRequest, ShellProxy};
pub use upstream::build_upstream_url;
