//! Append-only audit log of resolved queries.
//!
//! One line per query: `<ip> <found> <topic> <user_agent>\n`.

use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::Result;

/// Serializes writers so lines never interleave.
pub struct QueryLog {
    path: Mutex<PathBuf>,
}

/// Format one audit line. Line breaks inside fields are escaped.
pub fn format_entry(ip: &str, found: bool, topic: &str, user_agent: &str) -> String {
    let found = if found { "True" } else { "False" };
    format!(
        "{} {} {} {}\n",
        escape_field(ip),
        found,
        escape_field(topic),
        escape_field(user_agent)
    )
}

fn escape_field(field: &str) -> String {
    field.replace('\r', "\\r").replace('\n', "\\n")
}

impl QueryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Mutex::new(path.into()),
        }
    }

    /// Point the log at a new file, e.g. after a config reload.
    pub async fn set_path(&self, path: &Path) {
        let mut current = self.path.lock().await;
        if current.as_path() != path {
            tracing::info!(path = %path.display(), "Query log path changed");
            *current = path.to_path_buf();
        }
    }

    /// Append one entry as a single write.
    pub async fn record(&self, ip: &str, found: bool, topic: &str, user_agent: &str) -> Result<()> {
        let line = format_entry(ip, found, topic, user_agent);

        let path = self.path.lock().await;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&*path).await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_format_entry() {
        assert_eq!(
            format_entry("1.2.3.4", true, "tar", "curl/8.0"),
            "1.2.3.4 True tar curl/8.0\n"
        );
    }

    #[test]
    fn test_line_breaks_escaped() {
        assert_eq!(
            format_entry("-", true, "tar\n6.6.6.6 True evil", "curl\r\nx"),
            "- True tar\\n6.6.6.6 True evil curl\\r\\nx\n"
        );
    }

    #[tokio::test]
    async fn test_concurrent_appends_keep_lines_whole() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log/queries.log");
        let log = Arc::new(QueryLog::new(&path));

        let mut tasks = Vec::new();
        for i in 0..50 {
            let log = log.clone();
            tasks.push(tokio::spawn(async move {
                log.record(&format!("10.0.0.{}", i), i % 2 == 0, "python/lambda", "curl/8.0")
                    .await
                    .unwrap();
            }));
        }
        for t in tasks {
            t.await.unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 50);
        for line in lines {
            let parts: Vec<_> = line.split(' ').collect();
            assert_eq!(parts.len(), 4);
            assert_eq!(parts[2], "python/lambda");
        }
    }
}
