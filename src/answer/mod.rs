//! Answer resolution.
//!
//! # Data Flow
//! ```text
//! topic + RequestOptions + OutputFormat
//!     → AnswerResolver (trait seam, CorpusResolver by default)
//!     → corpus lookup / keyword search / built-in page
//!     → render.rs (html or plain)
//!     → (text, found)
//! ```

pub mod options;
pub mod render;
pub mod resolver;

use async_trait::async_trait;

use crate::error::Result;
use crate::negotiation::OutputFormat;

pub use options::RequestOptions;
pub use resolver::CorpusResolver;

/// Turns a topic into rendered answer text and a found flag.
#[async_trait]
pub trait AnswerResolver: Send + Sync {
    async fn resolve(
        &self,
        topic: &str,
        options: &RequestOptions,
        format: OutputFormat,
    ) -> Result<(String, bool)>;
}
