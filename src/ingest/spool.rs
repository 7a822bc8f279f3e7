//! Spool directory writer for submitted cheat sheets.

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::ingest::{PostProcessor, PostRequest};

const UNNAMED: &str = "UNNAMED";

/// Writes every submitted cheat sheet to its own file in a spool directory.
pub struct SpoolPostProcessor {
    spool_dir: PathBuf,
}

impl SpoolPostProcessor {
    pub fn new(spool_dir: impl Into<PathBuf>) -> Self {
        Self {
            spool_dir: spool_dir.into(),
        }
    }

    fn file_name(topic: &str) -> String {
        let nonce = Uuid::new_v4().simple().to_string();
        format!("{}.{}", topic.replace('/', "."), &nonce[..12])
    }

    async fn save(&self, topic: &str, cheatsheet: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.spool_dir).await?;
        let path = self.spool_dir.join(Self::file_name(topic));
        tokio::fs::write(&path, cheatsheet.replace("<br>", "\n")).await?;
        Ok(path)
    }
}

/// Split a submission into `(topic, cheat sheet)` pairs.
///
/// Form fields are either `topic=text`, or a bare text field (empty key,
/// or empty value) that is filed under the request topic.
pub fn submissions(request: &PostRequest) -> Vec<(String, String)> {
    let default_topic = request.topic.as_deref().unwrap_or(UNNAMED).to_string();

    let is_form = request
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    if !is_form {
        let text = String::from_utf8_lossy(&request.body).into_owned();
        return if text.trim().is_empty() {
            Vec::new()
        } else {
            vec![(default_topic, text)]
        };
    }

    url::form_urlencoded::parse(&request.body)
        .filter_map(|(key, value)| {
            let (topic, text) = if key.is_empty() {
                (default_topic.clone(), value.into_owned())
            } else if value.is_empty() {
                (default_topic.clone(), key.into_owned())
            } else {
                (key.into_owned(), value.into_owned())
            };
            (!text.trim().is_empty()).then_some((topic, text))
        })
        .collect()
}

#[async_trait]
impl PostProcessor for SpoolPostProcessor {
    async fn process(&self, request: PostRequest, html_needed: bool) -> Result<()> {
        for (topic, text) in submissions(&request) {
            let path = self.save(&topic, &text).await?;
            tracing::info!(
                topic = %topic,
                path = %path.display(),
                bytes = text.len(),
                html = html_needed,
                "Cheat sheet submitted"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    fn request(topic: Option<&str>, content_type: Option<&str>, body: &'static str) -> PostRequest {
        PostRequest {
            topic: topic.map(String::from),
            content_type: content_type.map(String::from),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[test]
    fn test_raw_body_filed_under_topic() {
        let r = request(Some("go/maps"), None, "m := map[string]int{}");
        assert_eq!(
            submissions(&r),
            vec![("go/maps".to_string(), "m := map[string]int{}".to_string())]
        );
        assert!(submissions(&request(None, None, "  \n")).is_empty());
    }

    #[test]
    fn test_form_fields() {
        let r = request(
            None,
            Some("application/x-www-form-urlencoded"),
            "tar=tar+xf+a.tar&ls+-la=",
        );
        assert_eq!(
            submissions(&r),
            vec![
                ("tar".to_string(), "tar xf a.tar".to_string()),
                ("UNNAMED".to_string(), "ls -la".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_writes_spool_file() {
        let dir = tempfile::tempdir().unwrap();
        let processor = SpoolPostProcessor::new(dir.path().join("spool"));
        processor
            .process(request(Some("rust/iter"), None, "a<br>b"), false)
            .await
            .unwrap();

        let files: Vec<_> = std::fs::read_dir(dir.path().join("spool"))
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(files.len(), 1);
        let name = files[0].file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("rust.iter."));
        assert_eq!(std::fs::read_to_string(&files[0]).unwrap(), "a\nb");
    }
}
