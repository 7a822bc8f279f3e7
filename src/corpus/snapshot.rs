//! In-memory corpus snapshot loaded from a directory tree.

use std::collections::BTreeMap;
use std::path::Path;

use walkdir::WalkDir;

use crate::answer::options::RequestOptions;
use crate::corpus::{is_dir, is_internal, AnswerRecord, TopicSource};

/// Immutable topic → text map. Directory topics map to an empty body.
#[derive(Debug, Clone, Default)]
pub struct CorpusSnapshot {
    entries: BTreeMap<String, String>,
}

impl CorpusSnapshot {
    /// Build a snapshot from (topic, text) pairs.
    ///
    /// Parent directories of nested topics are added automatically.
    pub fn from_entries<I, T, B>(entries: I) -> Self
    where
        I: IntoIterator<Item = (T, B)>,
        T: Into<String>,
        B: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (topic, body) in entries {
            let topic = topic.into();
            for (idx, _) in topic.match_indices('/') {
                if idx + 1 < topic.len() {
                    map.entry(topic[..=idx].to_string()).or_insert_with(String::new);
                }
            }
            map.insert(topic, body.into());
        }
        Self { entries: map }
    }

    /// Walk `root` and load every regular file as a topic.
    ///
    /// Hidden files and directories are skipped. Unreadable or non-UTF-8
    /// files are logged and skipped.
    pub fn load_dir(root: &Path) -> std::io::Result<Self> {
        let mut entries = Vec::new();

        let walker = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !e.file_name().to_string_lossy().starts_with('.'));

        for entry in walker {
            let entry = entry.map_err(std::io::Error::other)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let topic = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            match std::fs::read_to_string(entry.path()) {
                Ok(body) => entries.push((topic, body)),
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), error = %e, "Skipping unreadable cheat sheet");
                }
            }
        }

        let snapshot = Self::from_entries(entries);
        tracing::info!(root = %root.display(), topics = snapshot.len(), "Corpus loaded");
        Ok(snapshot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.entries.contains_key(topic)
    }

    /// Immediate children of a directory topic.
    fn children(&self, dir: &str) -> Vec<&str> {
        self.entries
            .range(dir.to_string()..)
            .map(|(k, _)| k.as_str())
            .take_while(|k| k.starts_with(dir))
            .filter(|k| {
                let rest = &k[dir.len()..];
                !rest.is_empty() && !rest.trim_end_matches('/').contains('/')
            })
            .collect()
    }
}

/// Drop comment lines, keeping code only.
fn strip_comments(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .map(|line| format!("{}\n", line))
        .collect()
}

impl TopicSource for CorpusSnapshot {
    fn list_topics(&self, skip_internal: bool, skip_dirs: bool) -> Vec<String> {
        self.entries
            .keys()
            .filter(|t| !(skip_internal && is_internal(t)))
            .filter(|t| !(skip_dirs && is_dir(t)))
            .cloned()
            .collect()
    }

    fn resolve_answer(&self, topic: &str, options: &RequestOptions) -> Option<AnswerRecord> {
        let body = self.entries.get(topic)?;

        let (topic_type, answer) = if is_dir(topic) {
            let mut listing = String::new();
            for child in self.children(topic) {
                listing.push_str(&child[topic.len()..]);
                listing.push('\n');
            }
            ("dir", listing)
        } else if options.code_only {
            (if is_internal(topic) { "internal" } else { "cheat.sheets" }, strip_comments(body))
        } else {
            (if is_internal(topic) { "internal" } else { "cheat.sheets" }, body.clone())
        };

        Some(AnswerRecord {
            topic: topic.to_string(),
            topic_type: topic_type.to_string(),
            answer,
            format: "code".to_string(),
        })
    }
}
