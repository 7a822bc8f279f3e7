//! Naive keyword search over the corpus.
//!
//! Results keep corpus order. There is no ranking.

use crate::answer::options::RequestOptions;
use crate::corpus::{AnswerRecord, TopicSource};
use crate::observability::metrics;
use crate::search::matcher::matches;
use crate::search::options::SearchOptions;

/// Keyword search bound to a corpus and a result cap.
pub struct SearchEngine<'a> {
    corpus: &'a dyn TopicSource,
    limit: usize,
}

impl<'a> SearchEngine<'a> {
    pub fn new(corpus: &'a dyn TopicSource, limit: usize) -> Self {
        Self { corpus, limit }
    }

    /// Search `directory` (a topic prefix, empty for all) for `keyword`.
    ///
    /// When more than `limit` topics match, the first `limit` are returned
    /// followed by the LIMITED sentinel, and the remaining topics are not
    /// examined.
    pub fn find_answers_by_keyword(
        &self,
        directory: &str,
        keyword: Option<&str>,
        option_flags: &str,
        request_options: &RequestOptions,
    ) -> Vec<AnswerRecord> {
        let options = SearchOptions::parse(option_flags);
        let mut found = Vec::new();

        for topic in self.corpus.list_topics(true, true) {
            let Some(subtopic) = topic.strip_prefix(directory) else {
                continue;
            };
            if !options.recursive && subtopic.contains('/') {
                continue;
            }

            let Some(record) = self.corpus.resolve_answer(&topic, request_options) else {
                continue;
            };
            if !matches(&record.answer, keyword, &options) {
                continue;
            }

            if found.len() == self.limit {
                found.push(AnswerRecord::limited(self.limit));
                break;
            }
            found.push(record);
        }

        metrics::record_search(found.len());
        tracing::debug!(
            directory = %directory,
            keyword = ?keyword,
            flags = %option_flags,
            results = found.len(),
            "Keyword search finished"
        );
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusSnapshot;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn corpus() -> CorpusSnapshot {
        CorpusSnapshot::from_entries([
            (":internal", "needle"),
            ("a/b", "needle in b"),
            ("a/b/c", "needle in c"),
            ("a/d", "hay"),
            ("e", "Needle in e"),
        ])
    }

    fn topics(records: &[AnswerRecord]) -> Vec<&str> {
        records.iter().map(|r| r.topic.as_str()).collect()
    }

    #[test]
    fn test_non_recursive_scope() {
        let c = corpus();
        let engine = SearchEngine::new(&c, 20);
        let found = engine.find_answers_by_keyword("a/", Some("needle"), "", &RequestOptions::default());
        assert_eq!(topics(&found), vec!["a/b"]);
    }

    #[test]
    fn test_recursive_scope() {
        let c = corpus();
        let engine = SearchEngine::new(&c, 20);
        let found = engine.find_answers_by_keyword("a/", Some("needle"), "r", &RequestOptions::default());
        assert_eq!(topics(&found), vec!["a/b", "a/b/c"]);
    }

    #[test]
    fn test_whole_corpus_skips_internal() {
        let c = corpus();
        let engine = SearchEngine::new(&c, 20);
        let found = engine.find_answers_by_keyword("", Some("needle"), "ri", &RequestOptions::default());
        assert_eq!(topics(&found), vec!["a/b", "a/b/c", "e"]);
    }

    #[test]
    fn test_cap_appends_sentinel() {
        let entries: Vec<_> = (0..10).map(|i| (format!("t{:02}", i), "match".to_string())).collect();
        let c = CorpusSnapshot::from_entries(entries);
        let engine = SearchEngine::new(&c, 3);

        let found = engine.find_answers_by_keyword("", None, "", &RequestOptions::default());
        assert_eq!(found.len(), 4);
        assert_eq!(topics(&found[..3]), vec!["t00", "t01", "t02"]);
        assert!(found[3].is_limited());
        assert_eq!(found[3].topic, "LIMITED");
        assert_eq!(found[3].answer, "LIMITED TO 3 ANSWERS");
    }

    #[test]
    fn test_exactly_limit_matches_has_no_sentinel() {
        let c = CorpusSnapshot::from_entries([("x", "m"), ("y", "m")]);
        let engine = SearchEngine::new(&c, 2);
        let found = engine.find_answers_by_keyword("", Some("m"), "", &RequestOptions::default());
        assert_eq!(topics(&found), vec!["x", "y"]);
    }

    struct CountingCorpus {
        inner: CorpusSnapshot,
        resolved: AtomicUsize,
    }

    impl TopicSource for CountingCorpus {
        fn list_topics(&self, skip_internal: bool, skip_dirs: bool) -> Vec<String> {
            self.inner.list_topics(skip_internal, skip_dirs)
        }

        fn resolve_answer(&self, topic: &str, options: &RequestOptions) -> Option<AnswerRecord> {
            self.resolved.fetch_add(1, Ordering::SeqCst);
            self.inner.resolve_answer(topic, options)
        }
    }

    #[test]
    fn test_iteration_stops_at_cap() {
        let entries: Vec<_> = (0..10).map(|i| (format!("t{}", i), "m".to_string())).collect();
        let corpus = CountingCorpus {
            inner: CorpusSnapshot::from_entries(entries),
            resolved: AtomicUsize::new(0),
        };
        let engine = SearchEngine::new(&corpus, 2);
        let found = engine.find_answers_by_keyword("", Some("m"), "", &RequestOptions::default());

        assert_eq!(found.len(), 3);
        assert_eq!(corpus.resolved.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_deterministic() {
        let c = corpus();
        let engine = SearchEngine::new(&c, 1);
        let first = engine.find_answers_by_keyword("", Some("needle"), "ri", &RequestOptions::default());
        let second = engine.find_answers_by_keyword("", Some("needle"), "ri", &RequestOptions::default());
        assert_eq!(first, second);
    }
}
