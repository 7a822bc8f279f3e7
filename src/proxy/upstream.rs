//! Upstream URL and header rewriting for the shell relay.

use axum::http::{header, HeaderMap, HeaderName};
use url::form_urlencoded;
use url::Url;

/// Response headers never copied back to the client.
pub const EXCLUDED_RESPONSE_HEADERS: [HeaderName; 4] = [
    header::CONTENT_ENCODING,
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::CONNECTION,
];

/// Build the upstream URL from the relay base, the path after the shell
/// prefix and the client's raw query string.
///
/// A `q` argument is expanded into one `arg` parameter per whitespace
/// separated word and replaces the query. Otherwise the query is kept.
pub fn build_upstream_url(
    base: &str,
    path_remainder: &str,
    raw_query: Option<&str>,
) -> Result<Url, url::ParseError> {
    let mut url = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path_remainder.trim_start_matches('/')
    );

    let q = raw_query.and_then(|query| {
        form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "q")
            .map(|(_, value)| value.into_owned())
    });

    match (q, raw_query) {
        (Some(q), _) => {
            let mut serializer = form_urlencoded::Serializer::new(String::new());
            for word in q.split_whitespace() {
                serializer.append_pair("arg", word);
            }
            let query = serializer.finish();
            if !query.is_empty() {
                url.push('?');
                url.push_str(&query);
            }
        }
        (None, Some(query)) if !query.is_empty() => {
            url.push('?');
            url.push_str(query);
        }
        _ => {}
    }

    Url::parse(&url)
}

/// Request headers for the upstream call: everything but `Host`.
///
/// `Accept-Encoding` is dropped as well, since `Content-Encoding` is not
/// relayed back and the body must reach the client decoded.
pub fn upstream_request_headers(headers: &HeaderMap) -> HeaderMap {
    let mut out = headers.clone();
    out.remove(header::HOST);
    out.remove(header::ACCEPT_ENCODING);
    out.remove(header::CONNECTION);
    out
}

/// Remove the excluded headers from an upstream response.
pub fn filter_response_headers(headers: &mut HeaderMap) {
    for name in EXCLUDED_RESPONSE_HEADERS.iter() {
        headers.remove(name);
    }
}
