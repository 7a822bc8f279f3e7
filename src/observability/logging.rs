//! Structured logging setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. `debug` forces debug output
/// for this crate.
pub fn init_logging(log_level: &str, debug: bool) {
    let fallback = if debug {
        "cheat_server=debug,tower_http=debug".to_string()
    } else {
        format!("cheat_server={},tower_http=info", log_level)
    };

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
