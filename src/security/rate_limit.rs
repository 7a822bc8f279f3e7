//! Per-IP query limits.
//!
//! Counts are kept in fixed wall-clock windows (minute, hour, day). A
//! window's counters are cleared when its window index changes.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::LimitsConfig;
use crate::observability::metrics;

/// Per-IP quota check.
pub trait RateGate: Send + Sync {
    /// `None` when the query is allowed, otherwise the denial reason.
    fn check(&self, ip: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Window {
    Minute,
    Hour,
    Day,
}

impl Window {
    const ALL: [Window; 3] = [Window::Minute, Window::Hour, Window::Day];

    fn name(self) -> &'static str {
        match self {
            Window::Minute => "min",
            Window::Hour => "hour",
            Window::Day => "day",
        }
    }

    fn seconds(self) -> u64 {
        match self {
            Window::Minute => 60,
            Window::Hour => 3600,
            Window::Day => 86400,
        }
    }
}

/// Counters of one window.
#[derive(Default)]
struct WindowCounter {
    index: u64,
    visits: HashMap<String, u64>,
}

/// Fixed-window query limiter.
pub struct QueryLimits {
    windows: Mutex<[WindowCounter; 3]>,
    limits: [u64; 3],
    whitelist: HashSet<String>,
}

impl QueryLimits {
    pub fn new(config: &LimitsConfig) -> Self {
        Self {
            windows: Mutex::new(Default::default()),
            limits: [config.per_minute, config.per_hour, config.per_day],
            whitelist: config.whitelist.iter().cloned().collect(),
        }
    }

    /// Check `ip` at a given unix time (seconds).
    pub fn check_at(&self, ip: &str, now: u64) -> Option<String> {
        if self.whitelist.contains(ip) {
            return None;
        }

        let mut windows = self.windows.lock().expect("query limits mutex poisoned");

        for (i, window) in Window::ALL.iter().enumerate() {
            let counter = &mut windows[i];
            let index = now / window.seconds();
            if counter.index != index {
                counter.visits.clear();
                counter.index = index;
            }
        }

        for (i, window) in Window::ALL.iter().enumerate() {
            let visits = windows[i].visits.entry(ip.to_string()).or_insert(0);
            *visits += 1;

            if *visits > self.limits[i] {
                tracing::warn!(
                    client = %ip,
                    window = window.name(),
                    limit = self.limits[i],
                    "Query limit exceeded"
                );
                metrics::record_rate_limited(window.name());
                return Some(format!(
                    "Not so fast! Number of queries per {} is limited to {}",
                    window.name(),
                    self.limits[i]
                ));
            }
        }

        None
    }
}

impl RateGate for QueryLimits {
    fn check(&self, ip: &str) -> Option<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.check_at(ip, now)
    }
}
