//! Server error type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors surfaced while handling a request.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Filesystem access failed (audit log, spool, static page).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The shell service could not be reached.
    #[error("Upstream unreachable: {0}")]
    Upstream(String),

    /// The shell service did not answer in time.
    #[error("Upstream timed out after {0} seconds")]
    UpstreamTimeout(u64),

    /// A request could not be built or read.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The answer backend failed.
    #[error("Resolver error: {0}")]
    Resolver(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match self {
            ServerError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ServerError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Io(_) | ServerError::Resolver(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::error!(status = %status, error = %self, "Request failed");
        (status, self.to_string()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
