//! Language and output format negotiation.
//!
//! # Data Flow
//! ```text
//! Request headers + query arguments
//!     → format.rs   (User-Agent → html / plain)
//!     → language.rs (lang arg > host suffix > Accept-Language)
//!     → Negotiated { language, html_needed }
//! ```

pub mod format;
pub mod language;

use axum::http::{header, HeaderMap};

use crate::config::NegotiationConfig;

pub use format::{is_html_needed, is_script_topic, output_format, OutputFormat};
pub use language::{answer_language, parse_accept_language};

/// Outcome of negotiation for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negotiated {
    pub language: Option<String>,
    pub html_needed: bool,
}

/// Negotiate language and format from headers and the `lang` argument.
pub fn resolve(headers: &HeaderMap, lang_arg: Option<&str>, config: &NegotiationConfig) -> Negotiated {
    let header_str = |name: header::HeaderName| headers.get(name).and_then(|v| v.to_str().ok());

    let user_agent = header_str(header::USER_AGENT).unwrap_or_default();

    Negotiated {
        language: answer_language(
            header_str(header::HOST),
            lang_arg,
            header_str(header::ACCEPT_LANGUAGE),
            &config.site_suffix,
        ),
        html_needed: is_html_needed(user_agent, &config.plaintext_clients),
    }
}
