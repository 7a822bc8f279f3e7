//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (tracing, timeouts, body limit, request ID)
//! - Build the default collaborators from configuration
//! - Apply configuration reloads and drain on shutdown

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    http::Request,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::answer::{AnswerResolver, CorpusResolver};
use crate::config::ServerConfig;
use crate::corpus::CorpusSnapshot;
use crate::http::assets::send_malformed;
use crate::http::handler::{answer_root, answer_topic};
use crate::http::request::{MakeRequestUuidV4, X_REQUEST_ID};
use crate::ingest::{PostProcessor, SpoolPostProcessor};
use crate::observability::QueryLog;
use crate::proxy::ShellProxy;
use crate::security::{QueryLimits, RateGate};
use crate::session::{PersistentSessionStore, SessionStore};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ArcSwap<ServerConfig>>,
    pub resolver: Arc<dyn AnswerResolver>,
    pub rate_gate: Arc<dyn RateGate>,
    pub sessions: Arc<dyn SessionStore>,
    pub post_processor: Arc<dyn PostProcessor>,
    pub proxy: ShellProxy,
    pub query_log: Arc<QueryLog>,
}

/// Pluggable collaborators of the answer pipeline.
pub struct Collaborators {
    pub resolver: Arc<dyn AnswerResolver>,
    pub rate_gate: Arc<dyn RateGate>,
    pub sessions: Arc<dyn SessionStore>,
    pub post_processor: Arc<dyn PostProcessor>,
}

/// HTTP server for cheat sheets.
pub struct HttpServer {
    router: Router,
    state: AppState,
    sessions: Option<PersistentSessionStore>,
}

impl HttpServer {
    /// Create a server with the default, filesystem-backed collaborators.
    pub fn new(config: ServerConfig) -> std::io::Result<Self> {
        let shared = Arc::new(ArcSwap::from_pointee(config.clone()));

        let corpus_root = Path::new(&config.paths.corpus_root);
        let corpus = if corpus_root.is_dir() {
            CorpusSnapshot::load_dir(corpus_root)?
        } else {
            tracing::warn!(root = %corpus_root.display(), "Corpus directory missing, serving built-in pages only");
            CorpusSnapshot::default()
        };

        let sessions = if config.paths.session_store.is_empty() {
            PersistentSessionStore::new(None)
        } else {
            PersistentSessionStore::load_from_file(Path::new(&config.paths.session_store))?
        };

        let collaborators = Collaborators {
            resolver: Arc::new(CorpusResolver::new(Arc::new(corpus), shared.clone())),
            rate_gate: Arc::new(QueryLimits::new(&config.limits)),
            sessions: Arc::new(sessions.clone()),
            post_processor: Arc::new(SpoolPostProcessor::new(&config.paths.spool_dir)),
        };

        let mut server = Self::build(shared, collaborators);
        server.sessions = Some(sessions);
        Ok(server)
    }

    /// Create a server around caller-supplied collaborators.
    pub fn with_collaborators(config: ServerConfig, collaborators: Collaborators) -> Self {
        Self::build(Arc::new(ArcSwap::from_pointee(config)), collaborators)
    }

    fn build(config: Arc<ArcSwap<ServerConfig>>, collaborators: Collaborators) -> Self {
        let snapshot = config.load_full();
        let state = AppState {
            proxy: ShellProxy::new(&snapshot.proxy),
            query_log: Arc::new(QueryLog::new(PathBuf::from(&snapshot.paths.query_log))),
            config,
            resolver: collaborators.resolver,
            rate_gate: collaborators.rate_gate,
            sessions: collaborators.sessions,
            post_processor: collaborators.post_processor,
        };

        let router = Self::build_router(&snapshot, state.clone());
        Self {
            router,
            state,
            sessions: None,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let static_root = PathBuf::from(&config.paths.static_root);

        Router::new()
            .nest_service("/files", ServeDir::new(&static_root))
            .route_service("/favicon.ico", ServeFile::new(static_root.join("favicon.ico")))
            .route("/malformed-response.html", get(send_malformed))
            .route("/", get(answer_root).post(answer_root))
            .route("/{*topic}", get(answer_topic).post(answer_topic))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(RequestBodyLimitLayer::new(config.timeouts.max_body_bytes))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configuration updates received on `config_updates` are applied to
    /// subsequent requests. Returns once `shutdown` fires and in-flight
    /// requests have drained.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ServerConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let config = self.state.config.clone();
        let query_log = self.state.query_log.clone();
        tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                query_log.set_path(Path::new(&new_config.paths.query_log)).await;
                config.store(Arc::new(new_config));
                tracing::info!("Configuration reloaded");
            }
        });

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        if let Some(sessions) = &self.sessions {
            if let Err(e) = sessions.flush() {
                tracing::error!(error = %e, "Failed to persist session memory");
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
