//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use cheat_server::answer::{AnswerResolver, RequestOptions};
use cheat_server::config::ServerConfig;
use cheat_server::error::{Result, ServerError};
use cheat_server::http::{Collaborators, HttpServer};
use cheat_server::ingest::{PostProcessor, PostRequest};
use cheat_server::negotiation::OutputFormat;
use cheat_server::security::RateGate;
use cheat_server::session::{PersistentSessionStore, SessionStore};

pub const CURL: &str = "curl/8.4.0";
pub const FIREFOX: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0";

/// Resolver that records every call and answers from a closure.
pub struct RecordingResolver {
    pub calls: Mutex<Vec<(String, RequestOptions, OutputFormat)>>,
    answer: Box<dyn Fn(&str) -> Result<(String, bool)> + Send + Sync>,
}

impl RecordingResolver {
    pub fn new<F>(answer: F) -> Arc<Self>
    where
        F: Fn(&str) -> Result<(String, bool)> + Send + Sync + 'static,
    {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            answer: Box::new(answer),
        })
    }

    /// Echoes the topic back as a found answer.
    pub fn echo() -> Arc<Self> {
        Self::new(|topic| Ok((format!("answer for {}\n", topic), true)))
    }

    pub fn failing() -> Arc<Self> {
        Self::new(|_| Err(ServerError::Resolver("backend down".into())))
    }

    pub fn topics(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(t, _, _)| t.clone()).collect()
    }

    pub fn last_call(&self) -> Option<(String, RequestOptions, OutputFormat)> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl AnswerResolver for RecordingResolver {
    async fn resolve(
        &self,
        topic: &str,
        options: &RequestOptions,
        format: OutputFormat,
    ) -> Result<(String, bool)> {
        self.calls
            .lock()
            .unwrap()
            .push((topic.to_string(), options.clone(), format));
        (self.answer)(topic)
    }
}

/// Rate gate that records the IPs it was asked about.
pub struct RecordingGate {
    pub checked: Mutex<Vec<String>>,
    deny: Option<String>,
}

impl RecordingGate {
    pub fn allow() -> Arc<Self> {
        Arc::new(Self {
            checked: Mutex::new(Vec::new()),
            deny: None,
        })
    }

    pub fn deny(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            checked: Mutex::new(Vec::new()),
            deny: Some(reason.to_string()),
        })
    }

    pub fn checked(&self) -> Vec<String> {
        self.checked.lock().unwrap().clone()
    }
}

impl RateGate for RecordingGate {
    fn check(&self, ip: &str) -> Option<String> {
        self.checked.lock().unwrap().push(ip.to_string());
        self.deny.clone()
    }
}

/// Post processor that keeps submissions in memory.
#[derive(Default)]
pub struct RecordingPosts {
    pub received: Mutex<Vec<(PostRequest, bool)>>,
}

#[async_trait]
impl PostProcessor for RecordingPosts {
    async fn process(&self, request: PostRequest, html_needed: bool) -> Result<()> {
        self.received.lock().unwrap().push((request, html_needed));
        Ok(())
    }
}

/// A server wired to recording fakes.
pub struct Harness {
    pub server: HttpServer,
    pub resolver: Arc<RecordingResolver>,
    pub gate: Arc<RecordingGate>,
    pub sessions: Arc<PersistentSessionStore>,
    pub posts: Arc<RecordingPosts>,
    pub dir: tempfile::TempDir,
}

impl Harness {
    pub fn new(resolver: Arc<RecordingResolver>, gate: Arc<RecordingGate>) -> Self {
        Self::with_config(ServerConfig::default(), resolver, gate)
    }

    pub fn with_config(
        mut config: ServerConfig,
        resolver: Arc<RecordingResolver>,
        gate: Arc<RecordingGate>,
    ) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let static_root = dir.path().join("static");
        std::fs::create_dir_all(&static_root).unwrap();
        std::fs::write(static_root.join("malformed-response.html"), "<h1>back soon</h1>").unwrap();
        std::fs::write(static_root.join("style.css"), "pre { color: red; }").unwrap();

        config.paths.static_root = static_root.display().to_string();
        config.paths.malformed_page = static_root.join("malformed-response.html").display().to_string();
        config.paths.query_log = dir.path().join("log/queries.log").display().to_string();

        let sessions = Arc::new(PersistentSessionStore::new(None));
        let posts = Arc::new(RecordingPosts::default());

        let server = HttpServer::with_collaborators(
            config,
            Collaborators {
                resolver: resolver.clone(),
                rate_gate: gate.clone(),
                sessions: sessions.clone() as Arc<dyn SessionStore>,
                post_processor: posts.clone(),
            },
        );

        Self {
            server,
            resolver,
            gate,
            sessions,
            posts,
            dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        use tower::ServiceExt;
        self.server.router().oneshot(request).await.unwrap()
    }

    pub fn query_log(&self) -> String {
        std::fs::read_to_string(self.dir.path().join("log/queries.log")).unwrap_or_default()
    }
}

/// GET `uri` as the given user agent.
pub fn get(uri: &str, user_agent: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("user-agent", user_agent)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// A captured upstream request: request line and headers, lowercased names.
#[derive(Debug, Clone, Default)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Start a programmable mock upstream on an ephemeral port.
///
/// Each connection gets one raw HTTP/1.1 response built from the closure's
/// `(status line, extra headers, body)`. Request heads are captured.
pub async fn start_programmable_backend<F, Fut>(
    f: F,
) -> (SocketAddr, Arc<Mutex<Vec<CapturedRequest>>>)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (&'static str, Vec<(&'static str, String)>, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let seen = captured.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            let seen = seen.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 4096];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }

                let head = String::from_utf8_lossy(&buf).to_string();
                let mut lines = head.split("\r\n");
                let request_line = lines.next().unwrap_or_default().to_string();
                let headers = lines
                    .take_while(|l| !l.is_empty())
                    .filter_map(|l| l.split_once(':'))
                    .map(|(k, v)| (k.trim().to_lowercase(), v.trim().to_string()))
                    .collect();
                seen.lock().unwrap().push(CapturedRequest {
                    request_line,
                    headers,
                });

                let (status, extra, body) = f().await;
                let mut response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
                    status,
                    body.len()
                );
                for (name, value) in extra {
                    response.push_str(&format!("{}: {}\r\n", name, value));
                }
                response.push_str("\r\n");
                response.push_str(&body);

                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
                tokio::time::sleep(Duration::from_millis(10)).await;
            });
        }
    });

    (addr, captured)
}
