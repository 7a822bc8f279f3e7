//! Session query memory with JSON file persistence.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::Result;
use crate::session::SessionStore;

/// Thread-safe map of client id → last topic.
#[derive(Clone, Default)]
pub struct PersistentSessionStore {
    inner: Arc<DashMap<String, String>>,
    persistence_path: Option<PathBuf>,
}

impl PersistentSessionStore {
    /// Create an empty store. `None` keeps it memory-only.
    pub fn new(persistence_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            persistence_path,
        }
    }

    /// Load from file if it exists.
    pub fn load_from_file(path: &Path) -> std::io::Result<Self> {
        let store = Self::new(Some(path.to_path_buf()));
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let map: HashMap<String, String> = serde_json::from_reader(reader)?;
            for (k, v) in map {
                store.inner.insert(k, v);
            }
            tracing::info!(sessions = store.inner.len(), "Loaded session memory");
        }
        Ok(store)
    }

    /// Write all sessions to the persistence file, if any.
    pub fn flush(&self) -> std::io::Result<()> {
        let Some(path) = &self.persistence_path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let map: HashMap<String, String> = self
            .inner
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();

        // Replace the old file only once the new one is complete.
        let tmp = path.with_extension("tmp");
        let mut writer = BufWriter::new(File::create(&tmp)?);
        serde_json::to_writer(&mut writer, &map)?;
        writer.flush()?;
        std::fs::rename(&tmp, path)?;

        tracing::info!(sessions = map.len(), path = %path.display(), "Saved session memory");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl SessionStore for PersistentSessionStore {
    async fn save(&self, id: &str, topic: Option<&str>) -> Result<()> {
        match topic {
            Some(topic) => {
                self.inner.insert(id.to_string(), topic.to_string());
            }
            None => {
                self.inner.remove(id);
            }
        }
        Ok(())
    }

    async fn last(&self, id: &str) -> Result<Option<String>> {
        Ok(self.inner.get(id).map(|r| r.value().clone()))
    }
}
