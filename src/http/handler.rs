//! Main answer handler.
//!
//! # Pipeline (first applicable step wins)
//! ```text
//!  1. browser asset          → empty body
//!  2. :last                  → topic from session memory (or error text)
//!  3. id cookie              → remember topic
//!  4. POST                   → ingest, redirect / "OK"
//!  5. ?topic=X               → redirect to /X
//!  6. no topic               → :firstpage
//!  7. :shell-x/...           → relay to shell service
//!  8. negotiated language    → request options
//!  9. topic with '+'         → per-IP rate gate, 429 on denial
//! 10. resolve                → (text, found)
//! 11. maintenance marker     → degraded page (html only)
//! 12. audit log              → html or text/plain
//! ```

use std::net::SocketAddr;
use std::path::Path as FsPath;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, Path, State},
    http::{header, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};

use crate::answer::RequestOptions;
use crate::error::{Result, ServerError};
use crate::http::assets::malformed_page;
use crate::http::request::{client_ip, cookie, is_browser_asset, QueryArgs};
use crate::http::response::{empty, html, plain_text, plain_text_with_status, redirect};
use crate::http::server::AppState;
use crate::ingest::PostRequest;
use crate::negotiation::{self, output_format, OutputFormat};
use crate::observability::metrics;
use crate::proxy::RelayRequest;

/// Returned for `/:last` without an `id` cookie.
pub const LAST_WITHOUT_ID: &str = "ERROR: you have to set id for your requests to use /:last\n";

/// Topic used when none is given.
pub const FIRST_PAGE_TOPIC: &str = ":firstpage";

const LAST_TOPIC: &str = ":last";

/// `GET|POST /`
pub async fn answer_root(State(state): State<AppState>, request: Request<Body>) -> Response {
    answer(state, None, request).await
}

/// `GET|POST /{*topic}`
pub async fn answer_topic(
    State(state): State<AppState>,
    Path(topic): Path<String>,
    request: Request<Body>,
) -> Response {
    answer(state, Some(topic), request).await
}

async fn answer(state: AppState, topic: Option<String>, request: Request<Body>) -> Response {
    let start = Instant::now();
    match route(&state, topic, request).await {
        Ok((outcome, response)) => {
            metrics::record_request(outcome, response.status().as_u16(), start);
            response
        }
        Err(e) => {
            let response = e.into_response();
            metrics::record_request("error", response.status().as_u16(), start);
            response
        }
    }
}

async fn route(
    state: &AppState,
    mut topic: Option<String>,
    request: Request<Body>,
) -> Result<(&'static str, Response)> {
    let config = state.config.load_full();
    let (parts, body) = request.into_parts();

    let args = QueryArgs::parse(parts.uri.query());
    let user_agent = parts
        .headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_lowercase();
    let negotiated = negotiation::resolve(&parts.headers, args.get("lang"), &config.negotiation);
    let mut options = RequestOptions::from_args(args.pairs());

    if topic.as_deref().is_some_and(is_browser_asset) {
        return Ok(("asset", empty()));
    }

    let session_id = cookie(&parts.headers, "id");
    if topic.as_deref().map(|t| t.trim_start_matches('/')) == Some(LAST_TOPIC) {
        let Some(id) = &session_id else {
            return Ok(("last_without_id", plain_text(LAST_WITHOUT_ID)));
        };
        topic = state.sessions.last(id).await?;
        tracing::debug!(session = %id, topic = ?topic, "Repeating last query");
    } else if let Some(id) = &session_id {
        if let Err(e) = state.sessions.save(id, topic.as_deref()).await {
            tracing::warn!(session = %id, error = %e, "Failed to remember query");
        }
    }

    if parts.method == Method::POST {
        let body = axum::body::to_bytes(body, config.timeouts.max_body_bytes)
            .await
            .map_err(|e| ServerError::BadRequest(e.to_string()))?;
        let content_type = parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        state
            .post_processor
            .process(
                PostRequest {
                    topic: topic.clone(),
                    content_type,
                    body,
                },
                negotiated.html_needed,
            )
            .await?;

        let response = if negotiated.html_needed {
            redirect("/")?
        } else {
            plain_text("OK\n")
        };
        return Ok(("post", response));
    }

    if let Some(legacy) = args.get("topic") {
        return Ok(("redirect", redirect(&format!("/{}", legacy))?));
    }

    let topic = topic.unwrap_or_else(|| FIRST_PAGE_TOPIC.to_string());

    let shell_prefix = state.proxy.prefix();
    if let Some(rest) = topic.strip_prefix(shell_prefix) {
        let raw_path = parts.uri.path().trim_start_matches('/');
        let path_remainder = raw_path.strip_prefix(shell_prefix).unwrap_or(rest);
        let response = state
            .proxy
            .relay(RelayRequest {
                method: parts.method.clone(),
                headers: &parts.headers,
                path_remainder,
                raw_query: parts.uri.query(),
                body,
            })
            .await?;
        return Ok(("proxy", response));
    }

    if let Some(lang) = negotiated.language {
        options.lang = Some(lang);
    }

    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip = client_ip(&parts.headers, peer);

    if topic.contains('+') {
        if let Some(reason) = state.rate_gate.check(&ip) {
            return Ok((
                "rate_limited",
                plain_text_with_status(StatusCode::TOO_MANY_REQUESTS, format!("429 {}\n", reason)),
            ));
        }
    }

    let format = output_format(negotiated.html_needed, &topic, &config.negotiation.script_topics);
    let (result, found) = state.resolver.resolve(&topic, &options, format).await?;

    let marker = config.negotiation.maintenance_marker.as_str();
    if format == OutputFormat::Html && !marker.is_empty() && result.contains(marker) {
        tracing::warn!(topic = %topic, "Answer backend in maintenance mode, serving fallback page");
        let page = malformed_page(FsPath::new(&config.paths.malformed_page)).await?;
        return Ok(("degraded", page));
    }

    state.query_log.record(&ip, found, &topic, &user_agent).await?;
    tracing::debug!(ip = %ip, topic = %topic, found, format = %format, "Answered query");

    let response = match format {
        OutputFormat::Html => html(result),
        OutputFormat::Ansi => plain_text(result),
    };
    Ok((if found { "found" } else { "not_found" }, response))
}
