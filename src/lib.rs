//! cheat.sh style cheat sheet server library.

pub mod answer;
pub mod config;
pub mod corpus;
pub mod error;
pub mod http;
pub mod ingest;
pub mod lifecycle;
pub mod negotiation;
pub mod observability;
pub mod proxy;
pub mod search;
pub mod security;
pub mod session;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
