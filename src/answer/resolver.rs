//! Corpus-backed answer resolver.
//!
//! # Topic Forms
//! - `:firstpage`, `:help`, `:list`: built-in pages
//! - `~kw`, `dir/~kw1~kw2`, `dir/~kw/ib`: keyword search
//! - `dir/`: directory listing
//! - anything else: direct corpus lookup

use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;

use crate::answer::options::RequestOptions;
use crate::answer::render::render;
use crate::answer::AnswerResolver;
use crate::config::ServerConfig;
use crate::corpus::{is_dir, TopicSource};
use crate::error::Result;
use crate::negotiation::OutputFormat;
use crate::search::SearchEngine;

const FIRST_PAGE: &str = "\
cheat.sh: community driven cheat sheets

Usage:
    curl cheat.sh/TOPIC         show cheat sheet on TOPIC
    curl cheat.sh/DIR/          list DIR
    curl cheat.sh/~KEYWORD      search cheat sheets for KEYWORD
    curl cheat.sh/:help         show this page
    curl cheat.sh/:list         list all topics
";

const HELP_PAGE: &str = "\
Search:
    /~KEYWORD             search all cheat sheets
    /DIR/~KEYWORD         search cheat sheets in DIR
    /~KW1~KW2             all keywords must be present
    /~KEYWORD/OPTIONS     i: case insensitive, b: word boundaries, r: recursive

Options (query arguments):
    ?q    quiet: no decorations
    ?Q    code only
    ?T    no terminal sequences
    ?style=STYLE
    ?lang=LANG

Sessions:
    send cookie id=SOME_ID, then /:last repeats your previous query
";

/// A keyword search request decoded from a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery<'a> {
    pub directory: &'a str,
    pub keyword: &'a str,
    pub flags: &'a str,
}

/// Decode `dir/~kw1~kw2/flags`. Returns `None` for non-search topics.
pub fn parse_search_topic(topic: &str) -> Option<SearchQuery<'_>> {
    let start = topic
        .match_indices('~')
        .map(|(idx, _)| idx)
        .find(|&idx| idx == 0 || topic.as_bytes()[idx - 1] == b'/')?;

    let (directory, rest) = topic.split_at(start);
    let (keyword, flags) = rest.split_once('/').unwrap_or((rest, ""));

    Some(SearchQuery {
        directory,
        keyword,
        flags,
    })
}

/// Resolves topics against an in-memory corpus.
pub struct CorpusResolver {
    corpus: Arc<dyn TopicSource>,
    config: Arc<ArcSwap<ServerConfig>>,
}

impl CorpusResolver {
    pub fn new(corpus: Arc<dyn TopicSource>, config: Arc<ArcSwap<ServerConfig>>) -> Self {
        Self { corpus, config }
    }

    /// Raw answer text and found flag, before rendering.
    fn answer_text(&self, topic: &str, options: &RequestOptions) -> (String, bool) {
        if let Some(query) = parse_search_topic(topic) {
            return self.search(&query, options);
        }

        match topic {
            ":help" => return (HELP_PAGE.to_string(), true),
            ":list" => {
                let mut listing = String::new();
                for t in self.corpus.list_topics(true, false) {
                    listing.push_str(&t);
                    listing.push('\n');
                }
                return (listing, true);
            }
            _ => {}
        }

        if let Some(record) = self.corpus.resolve_answer(topic, options) {
            return (record.answer, true);
        }

        if topic == ":firstpage" {
            return (FIRST_PAGE.to_string(), true);
        }

        let hint = if is_dir(topic) {
            "Unknown directory.\n"
        } else {
            "Unknown topic.\nUse /:list to see all topics, or search with /~KEYWORD\n"
        };
        (hint.to_string(), false)
    }

    fn search(&self, query: &SearchQuery<'_>, options: &RequestOptions) -> (String, bool) {
        let limit = self.config.load().search.limit;
        let engine = SearchEngine::new(self.corpus.as_ref(), limit);
        let keyword = Some(query.keyword).filter(|k| !k.is_empty());
        let records = engine.find_answers_by_keyword(query.directory, keyword, query.flags, options);

        let found = records.iter().any(|r| !r.is_limited());
        if !found {
            return (format!("No answers found for {}\n", query.keyword), false);
        }

        let mut text = String::new();
        for record in &records {
            if record.is_limited() {
                text.push_str(&format!("{}\n", record.answer));
                continue;
            }
            text.push_str(&format!("#[{}]\n{}", record.topic, record.answer));
            if !record.answer.ends_with('\n') {
                text.push('\n');
            }
            text.push('\n');
        }
        (text, true)
    }
}

#[async_trait]
impl AnswerResolver for CorpusResolver {
    async fn resolve(
        &self,
        topic: &str,
        options: &RequestOptions,
        format: OutputFormat,
    ) -> Result<(String, bool)> {
        let (text, found) = self.answer_text(topic, options);
        Ok((render(&text, topic, options, format), found))
    }
}
