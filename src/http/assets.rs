//! Static pages served outside the answer pipeline.

use std::path::Path;

use axum::{extract::State, response::Response};

use crate::error::Result;
use crate::http::response::html;
use crate::http::server::AppState;

/// Read the degraded-mode page from disk.
pub async fn malformed_page(path: &Path) -> Result<Response> {
    let page = tokio::fs::read_to_string(path).await?;
    Ok(html(page))
}

/// `GET /malformed-response.html`
pub async fn send_malformed(State(state): State<AppState>) -> Result<Response> {
    let config = state.config.load();
    malformed_page(Path::new(&config.paths.malformed_page)).await
}
