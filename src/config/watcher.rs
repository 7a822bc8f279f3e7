//! Hot reload of the configuration file.
//!
//! The parent directory is watched rather than the file itself, so editors
//! that save by renaming a temporary file still trigger a reload.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::ServerConfig;

/// Sections that only take effect on restart.
pub fn restart_required(current: &ServerConfig, next: &ServerConfig) -> Vec<&'static str> {
    let mut sections = Vec::new();
    if current.server != next.server {
        sections.push("server");
    }
    if current.limits != next.limits {
        sections.push("limits");
    }
    if current.proxy != next.proxy {
        sections.push("proxy");
    }
    if current.timeouts != next.timeouts {
        sections.push("timeouts");
    }
    if current.observability != next.observability {
        sections.push("observability");
    }
    if current.paths.static_root != next.paths.static_root
        || current.paths.corpus_root != next.paths.corpus_root
        || current.paths.spool_dir != next.paths.spool_dir
        || current.paths.session_store != next.paths.session_store
    {
        sections.push("paths");
    }
    sections
}

/// Sends a freshly loaded [`ServerConfig`] whenever the file changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<ServerConfig>,
}

impl ConfigWatcher {
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<ServerConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching. Dropping the returned handle stops the watch.
    ///
    /// `current` is the configuration the server started with; it is used
    /// to warn about edits that need a restart.
    pub fn run(self, current: ServerConfig) -> Result<RecommendedWatcher, notify::Error> {
        let target = self.path.clone();
        let directory = match target.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = target.file_name().map(|n| n.to_os_string());
        let applied = Mutex::new(current);
        let tx = self.update_tx;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!(error = %e, "Config watch error");
                        return;
                    }
                };

                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    return;
                }
                let touches_config = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                if !touches_config {
                    return;
                }

                let next = match load_config(&target) {
                    Ok(next) => next,
                    Err(e) => {
                        tracing::error!(error = %e, "Config reload rejected, keeping current settings");
                        return;
                    }
                };

                let Ok(mut applied) = applied.lock() else {
                    return;
                };
                if *applied == next {
                    return;
                }
                let stale = restart_required(&applied, &next);
                if !stale.is_empty() {
                    tracing::warn!(sections = ?stale, "Changed settings apply after restart");
                }
                *applied = next.clone();

                tracing::info!(path = %target.display(), "Config file changed, reloading");
                let _ = tx.send(next);
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&directory, RecursiveMode::NonRecursive)?;
        tracing::info!(path = %self.path.display(), "Config watcher started");
        Ok(watcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restart_required_sections() {
        let current = ServerConfig::default();

        let mut next = current.clone();
        next.search.limit = 5;
        next.paths.query_log = "other.log".into();
        assert!(restart_required(&current, &next).is_empty());

        next.proxy.request_secs = 5;
        next.paths.corpus_root = "/srv/cheat".into();
        assert_eq!(restart_required(&current, &next), vec!["proxy", "paths"]);
    }

    #[tokio::test]
    async fn test_reload_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cheat.toml");
        std::fs::write(&path, "[search]\nlimit = 20\n").unwrap();

        let (watcher, mut updates) = ConfigWatcher::new(&path);
        let _handle = watcher.run(ServerConfig::default()).unwrap();

        std::fs::write(&path, "[search]\nlimit = 7\n").unwrap();

        let next = tokio::time::timeout(Duration::from_secs(10), updates.recv())
            .await
            .expect("no reload within timeout")
            .unwrap();
        assert_eq!(next.search.limit, 7);
    }
}
