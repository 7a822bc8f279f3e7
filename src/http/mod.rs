//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, request ID)
//!     → handler.rs (answer pipeline)
//!         → request.rs (query args, cookies, client IP)
//!         → negotiation, session, security, proxy, answer
//!     → response.rs (html / text/plain / redirect)
//!     → Send to client
//! ```

pub mod assets;
pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use handler::LAST_WITHOUT_ID;
pub use request::X_REQUEST_ID;
pub use server::{AppState, Collaborators, HttpServer};
