//! Output format selection from the User-Agent.

use std::fmt;

/// Output format handed to the answer resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Rich markup for browsers.
    Html,
    /// Plain text (terminal) output.
    Ansi,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Html => write!(f, "html"),
            OutputFormat::Ansi => write!(f, "ansi"),
        }
    }
}

/// True unless the (lowercased) user agent names a plain-text client.
pub fn is_html_needed(user_agent: &str, plaintext_clients: &[String]) -> bool {
    let user_agent = user_agent.to_lowercase();
    plaintext_clients
        .iter()
        .all(|client| !user_agent.contains(client.as_str()))
}

/// True for topics that are always served as plain text.
pub fn is_script_topic(topic: &str, script_topics: &[String]) -> bool {
    script_topics.iter().any(|t| t == topic)
}

/// Final output format for a topic.
pub fn output_format(html_needed: bool, topic: &str, script_topics: &[String]) -> OutputFormat {
    if html_needed && !is_script_topic(topic, script_topics) {
        OutputFormat::Html
    } else {
        OutputFormat::Ansi
    }
}
