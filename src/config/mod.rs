//! Server configuration.
//!
//! ```text
//! cheat.toml
//!     → loader.rs     toml + serde, every field defaulted
//!     → validation.rs all semantic errors collected at once
//!     → Arc<ArcSwap<ServerConfig>> read by handlers per request
//!
//! watcher.rs: file edit → reload → validation → swap
//! ```
//!
//! Listener, corpus, limits, proxy, timeouts, static root and session
//! store are read once at startup. Search, negotiation, query log and
//! malformed page settings follow reloads.

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    LimitsConfig, ListenerConfig, NegotiationConfig, ObservabilityConfig, PathsConfig,
    ProxyConfig, SearchConfig, ServerConfig, TimeoutConfig,
};
