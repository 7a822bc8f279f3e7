//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the cheat sheet server.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub server: ListenerConfig,

    /// Filesystem locations.
    pub paths: PathsConfig,

    /// Keyword search settings.
    pub search: SearchConfig,

    /// Per-IP query limits.
    pub limits: LimitsConfig,

    /// Interactive shell upstream.
    pub proxy: ProxyConfig,

    /// Language and output format negotiation.
    pub negotiation: NegotiationConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8002").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8002".to_string(),
        }
    }
}

/// Filesystem paths used by the server.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root of the static files served under `/files/`.
    pub static_root: String,

    /// Page served when the answer backend reports maintenance mode.
    pub malformed_page: String,

    /// Append-only audit log of resolved queries.
    pub query_log: String,

    /// Root directory of the cheat sheet corpus.
    pub corpus_root: String,

    /// Directory receiving POSTed cheat sheets.
    pub spool_dir: String,

    /// JSON file persisting session query memory. Empty disables persistence.
    pub session_store: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            static_root: "share/static".to_string(),
            malformed_page: "share/static/malformed-response.html".to_string(),
            query_log: "log/queries.log".to_string(),
            corpus_root: "share/cheat.sheets".to_string(),
            spool_dir: "spool".to_string(),
            session_store: "log/sessions.json".to_string(),
        }
    }
}

/// Keyword search configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of answers returned before the LIMITED sentinel.
    pub limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { limit: 20 }
    }
}

/// Per-IP query limits, applied to `+` queries only.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Queries allowed per wall-clock minute.
    pub per_minute: u64,

    /// Queries allowed per wall-clock hour.
    pub per_hour: u64,

    /// Queries allowed per wall-clock day.
    pub per_day: u64,

    /// Addresses that are never limited.
    pub whitelist: Vec<String>,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            per_minute: 30,
            per_hour: 600,
            per_day: 1000,
            whitelist: Vec::new(),
        }
    }
}

/// Interactive shell proxy configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Base URL of the shell service (e.g., "http://127.0.0.1:3000").
    pub shell_upstream: String,

    /// Topic prefix that routes a request to the shell service.
    pub shell_prefix: String,

    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total upstream request timeout in seconds.
    pub request_secs: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            shell_upstream: "http://127.0.0.1:3000".to_string(),
            shell_prefix: ":shell-x/".to_string(),
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Language and output format negotiation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NegotiationConfig {
    /// Hostname suffix whose prefix selects the answer language.
    pub site_suffix: String,

    /// User-Agent fragments (lowercase) identifying plain-text clients.
    pub plaintext_clients: Vec<String>,

    /// Topics that are always served as plain text.
    pub script_topics: Vec<String>,

    /// Marker the answer backend emits while in maintenance mode.
    pub maintenance_marker: String,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            site_suffix: ".cheat.sh".to_string(),
            plaintext_clients: [
                "curl",
                "wget",
                "fetch",
                "httpie",
                "lwp-request",
                "openbsd ftp",
                "python-requests",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            script_topics: vec![":cht.sh".to_string()],
            maintenance_marker: "Please come back in several hours".to_string(),
        }
    }
}

/// Timeout configuration for request handling.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Maximum accepted POST body in bytes.
    pub max_body_bytes: usize,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 60,
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
