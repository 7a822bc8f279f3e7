//! Response builders.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::error::{Result, ServerError};

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Plain-text 200 response.
pub fn plain_text(body: impl Into<String>) -> Response {
    plain_text_with_status(StatusCode::OK, body)
}

pub fn plain_text_with_status(status: StatusCode, body: impl Into<String>) -> Response {
    (status, [(header::CONTENT_TYPE, TEXT_PLAIN)], body.into()).into_response()
}

pub fn html(body: String) -> Response {
    Html(body).into_response()
}

/// 302 redirect to `location`.
pub fn redirect(location: &str) -> Result<Response> {
    let value = HeaderValue::from_str(&location.replace(' ', "%20"))
        .map_err(|_| ServerError::BadRequest(format!("invalid redirect target {:?}", location)))?;
    Ok((StatusCode::FOUND, [(header::LOCATION, value)]).into_response())
}

/// Empty 200 response.
pub fn empty() -> Response {
    (StatusCode::OK, "").into_response()
}
