//! Keyword matching against answer text.
//!
//! # Design Decisions
//! - Several keywords joined with `~` must all be present (AND)
//! - Keywords are literal; regex metacharacters are escaped
//! - Word-boundary mode requires a non-word character or a string edge on
//!   both sides of the keyword

use regex::RegexBuilder;

use crate::search::options::SearchOptions;

/// Return true when every `~`-separated keyword occurs in `text`.
///
/// A missing or empty expression always matches. Empty keywords produced
/// by leading, trailing or doubled `~` are skipped.
pub fn matches(text: &str, keyword: Option<&str>, options: &SearchOptions) -> bool {
    let Some(keyword) = keyword else {
        return true;
    };

    keyword
        .split('~')
        .filter(|k| !k.is_empty())
        .all(|k| keyword_matches(text, k, options))
}

fn keyword_matches(text: &str, keyword: &str, options: &SearchOptions) -> bool {
    if !options.word_boundaries {
        return if options.insensitive {
            text.to_lowercase().contains(&keyword.to_lowercase())
        } else {
            text.contains(keyword)
        };
    }

    let pattern = format!(r"\b{{start-half}}{}\b{{end-half}}", regex::escape(keyword));
    match RegexBuilder::new(&pattern)
        .case_insensitive(options.insensitive)
        .build()
    {
        Ok(re) => re.is_match(text),
        Err(e) => {
            tracing::warn!(keyword = %keyword, error = %e, "Unusable search keyword");
            false
        }
    }
}
