//! Session-scoped query memory.
//!
//! Clients sending an `id` cookie get their last topic remembered, and
//! `/:last` repeats it.

pub mod store;

use async_trait::async_trait;

use crate::error::Result;

pub use store::PersistentSessionStore;

/// Last-topic memory keyed by an opaque client id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Remember `topic` for `id`. `None` (the root page) forgets it.
    async fn save(&self, id: &str, topic: Option<&str>) -> Result<()>;

    /// The last topic remembered for `id`.
    async fn last(&self, id: &str) -> Result<Option<String>>;
}
