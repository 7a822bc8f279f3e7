//! Configuration validation.
//!
//! Serde handles syntax; this module checks values that deserialize fine
//! but cannot work at runtime. All errors are collected, not just the first.

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::ServerConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address", config.server.bind_address),
        ));
    }

    if config.search.limit == 0 {
        errors.push(ValidationError::new("search.limit", "must be greater than 0"));
    }

    let limits = &config.limits;
    if limits.per_minute == 0 || limits.per_hour == 0 || limits.per_day == 0 {
        errors.push(ValidationError::new("limits", "every window limit must be greater than 0"));
    }

    match Url::parse(&config.proxy.shell_upstream) {
        Ok(url) if url.scheme() == "http" => {}
        Ok(url) => errors.push(ValidationError::new(
            "proxy.shell_upstream",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("proxy.shell_upstream", e.to_string())),
    }

    if config.proxy.shell_prefix.is_empty() {
        errors.push(ValidationError::new("proxy.shell_prefix", "must not be empty"));
    }

    if config.proxy.request_secs == 0 || config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts", "timeouts must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "not a socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
