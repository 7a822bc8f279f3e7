//! POST body ingestion.

pub mod spool;

use async_trait::async_trait;
use axum::body::Bytes;

use crate::error::Result;

pub use spool::SpoolPostProcessor;

/// A POST request, reduced to what ingestion needs.
#[derive(Debug, Clone)]
pub struct PostRequest {
    pub topic: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Consumes submitted content. Side effects only.
#[async_trait]
pub trait PostProcessor: Send + Sync {
    async fn process(&self, request: PostRequest, html_needed: bool) -> Result<()>;
}
