//! Request inspection helpers.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4)
//! - Decode query arguments and cookies
//! - Determine the client IP for rate limiting and the audit log

use std::net::SocketAddr;

use axum::http::{header, HeaderMap, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use url::form_urlencoded;
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Browser chrome files answered with an empty body.
const BROWSER_ASSETS: [&str; 3] = [
    "apple-touch-icon-precomposed.png",
    "apple-touch-icon.png",
    "apple-touch-icon-120x120-precomposed.png",
];

/// Assigns a UUID v4 to every request lacking an ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Decoded query arguments in request order.
#[derive(Debug, Clone, Default)]
pub struct QueryArgs(Vec<(String, String)>);

impl QueryArgs {
    pub fn parse(raw: Option<&str>) -> Self {
        Self(
            raw.map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
                .unwrap_or_default(),
        )
    }

    /// First value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Value of cookie `name`, if sent and non-empty.
pub fn cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim_matches('"').to_string())
        .filter(|v| !v.is_empty())
}

/// Client IP: first `X-Forwarded-For` entry, else the peer address.
///
/// IPv4-mapped IPv6 forwarded addresses lose their `::ffff:` prefix.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match forwarded {
        Some(ip) => ip.strip_prefix("::ffff:").unwrap_or(ip).to_string(),
        None => peer
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "-".to_string()),
    }
}

/// True for browser chrome requests that should not reach the resolver.
pub fn is_browser_asset(topic: &str) -> bool {
    BROWSER_ASSETS.contains(&topic) || topic.ends_with("/favicon.ico")
}
