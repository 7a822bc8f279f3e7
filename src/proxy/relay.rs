//! Blocking-free relay to the interactive shell service.

use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request},
    response::Response,
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::ProxyConfig;
use crate::error::{Result, ServerError};
use crate::observability::metrics;
use crate::proxy::upstream::{build_upstream_url, filter_response_headers, upstream_request_headers};

/// One request to relay.
pub struct RelayRequest<'a> {
    pub method: Method,
    pub headers: &'a HeaderMap,
    pub path_remainder: &'a str,
    pub raw_query: Option<&'a str>,
    pub body: Body,
}

/// HTTP client for the shell service. No retries.
#[derive(Clone)]
pub struct ShellProxy {
    client: Client<HttpConnector, Body>,
    base: String,
    prefix: String,
    timeout_secs: u64,
}

impl ShellProxy {
    pub fn new(config: &ProxyConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.connect_secs)));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            base: config.shell_upstream.clone(),
            prefix: config.shell_prefix.clone(),
            timeout_secs: config.request_secs,
        }
    }

    /// Topic prefix routed to the shell service, fixed at startup.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Forward the request and return the upstream response as-is, minus
    /// the excluded headers.
    ///
    /// Dropping the returned future (client gone) drops the upstream call.
    pub async fn relay(&self, request: RelayRequest<'_>) -> Result<Response> {
        let url = build_upstream_url(&self.base, request.path_remainder, request.raw_query)
            .map_err(|e| ServerError::BadRequest(format!("invalid upstream url: {}", e)))?;

        tracing::debug!(method = %request.method, url = %url, "Relaying to shell service");

        let mut builder = Request::builder().method(request.method).uri(url.as_str());
        if let Some(headers) = builder.headers_mut() {
            *headers = upstream_request_headers(request.headers);
        }
        let upstream_request = builder
            .body(request.body)
            .map_err(|e| ServerError::BadRequest(e.to_string()))?;

        let response: hyper::Response<Incoming> = tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            self.client.request(upstream_request),
        )
        .await
        .map_err(|_| ServerError::UpstreamTimeout(self.timeout_secs))?
        .map_err(|e| {
            tracing::error!(url = %url, error = %e, "Shell service unreachable");
            ServerError::Upstream(e.to_string())
        })?;

        metrics::record_proxy(response.status().as_u16());

        let (mut parts, body) = response.into_parts();
        filter_response_headers(&mut parts.headers);
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}
