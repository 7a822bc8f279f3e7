//! Cheat sheet corpus.
//!
//! # Data Flow
//! ```text
//! corpus root directory
//!     → snapshot.rs (walk once at startup, sorted)
//!     → TopicSource (list_topics / resolve_answer)
//!     → search engine, answer resolver
//! ```
//!
//! # Design Decisions
//! - The snapshot is immutable; iteration order is lexicographic and stable
//! - Internal topics start with `:`, directory topics end with `/`

pub mod snapshot;

use crate::answer::options::RequestOptions;

pub use snapshot::CorpusSnapshot;

/// Structured result of resolving a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub topic: String,
    pub topic_type: String,
    pub answer: String,
    pub format: String,
}

impl AnswerRecord {
    /// Sentinel appended when a search hits its result cap.
    pub fn limited(limit: usize) -> Self {
        Self {
            topic: "LIMITED".to_string(),
            topic_type: "LIMITED".to_string(),
            answer: format!("LIMITED TO {} ANSWERS", limit),
            format: "code".to_string(),
        }
    }

    pub fn is_limited(&self) -> bool {
        self.topic_type == "LIMITED"
    }
}

/// Read access to the topic corpus.
pub trait TopicSource: Send + Sync {
    /// All topic identifiers in corpus order.
    fn list_topics(&self, skip_internal: bool, skip_dirs: bool) -> Vec<String>;

    /// Resolve a topic into its answer, with request options applied.
    fn resolve_answer(&self, topic: &str, options: &RequestOptions) -> Option<AnswerRecord>;
}

/// True for internal/administrative topics.
pub fn is_internal(topic: &str) -> bool {
    topic.starts_with(':')
}

/// True for directory-only entries.
pub fn is_dir(topic: &str) -> bool {
    topic.ends_with('/')
}
