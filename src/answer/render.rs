//! Answer rendering for rich and plain clients.

use crate::answer::options::RequestOptions;
use crate::negotiation::OutputFormat;

/// Escape text for inclusion in HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render answer text for the negotiated format.
pub fn render(text: &str, topic: &str, options: &RequestOptions, format: OutputFormat) -> String {
    match format {
        OutputFormat::Ansi => {
            if text.ends_with('\n') || text.is_empty() {
                text.to_string()
            } else {
                format!("{}\n", text)
            }
        }
        OutputFormat::Html => {
            let lang = options.lang.as_deref().unwrap_or("en");
            let style = options
                .style
                .as_deref()
                .map(|s| format!(" class=\"style-{}\"", escape_html(s)))
                .unwrap_or_default();
            let footer = if options.quiet {
                String::new()
            } else {
                "<footer><a href=\"/:help\">help</a> <a href=\"/:list\">list</a></footer>\n".to_string()
            };

            format!(
                "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head>\n<meta charset=\"utf-8\">\n\
                 <title>cheat.sh/{title}</title>\n\
                 <link rel=\"stylesheet\" href=\"/files/style.css\">\n</head>\n\
                 <body>\n<pre{style}>{body}</pre>\n{footer}</body>\n</html>\n",
                lang = escape_html(lang),
                title = escape_html(topic),
                style = style,
                body = escape_html(text),
                footer = footer,
            )
        }
    }
}
