//! In-process stand-in for the budget API.
//!
//! Replies are scripted per `"METHOD /path"` key; every request that reaches
//! the server is recorded with its Authorization header and body.

#![allow(dead_code)]

use std::collections::HashMap;
use std::convert::Infallible;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;

use budgetbaba_core::models::UserProfile;
use budgetbaba_core::storage::{KeyValueStore, MemoryStore, TOKEN_KEY, USER_KEY};
use budgetbaba_core::{AppContext, Config};

pub const API_PREFIX: &str = "/api/v1.0";

#[derive(Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
    pub body_delay: Duration,
}

impl Reply {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
            body_delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Send the status and headers at once but hold the body back.
    pub fn stalled_body(mut self, delay: Duration) -> Self {
        self.body_delay = delay;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Seen {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Clone, Default)]
pub struct MockApi {
    routes: Arc<Mutex<HashMap<String, Reply>>>,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, method: &str, path: &str, reply: Reply) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert(format!("{} {}", method, path), reply);
        self
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn seen_for(&self, method: &str, path: &str) -> Vec<Seen> {
        self.seen()
            .into_iter()
            .filter(|s| s.method == method && s.path == path)
            .collect()
    }

    /// Serve on an ephemeral port and return the API base URL.
    pub async fn start(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(handle).with_state(self.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}{}", addr, API_PREFIX)
    }
}

async fn handle(
    State(api): State<MockApi>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri
        .path()
        .strip_prefix(API_PREFIX)
        .unwrap_or(uri.path())
        .to_string();
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    api.seen.lock().unwrap().push(Seen {
        method: method.to_string(),
        path: path.clone(),
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        body,
    });

    let reply = api
        .routes
        .lock()
        .unwrap()
        .get(&format!("{} {}", method, path))
        .cloned();

    match reply {
        Some(reply) => {
            if !reply.delay.is_zero() {
                tokio::time::sleep(reply.delay).await;
            }
            let status = StatusCode::from_u16(reply.status).unwrap();
            let headers = [(header::CONTENT_TYPE, "application/json")];
            if reply.body_delay.is_zero() {
                return (status, headers, reply.body).into_response();
            }
            let (body, delay) = (reply.body, reply.body_delay);
            let chunk = futures::stream::once(async move {
                tokio::time::sleep(delay).await;
                Ok::<_, Infallible>(body)
            });
            (status, headers, Body::from_stream(chunk)).into_response()
        }
        None => (StatusCode::NOT_FOUND, r#"{"message":"no such route"}"#).into_response(),
    }
}

pub fn config_for(base_url: &str) -> Config {
    Config {
        api_base_url: base_url.to_string(),
        request_timeout_secs: 5,
        ..Config::default()
    }
}

/// Storage already holding a logged-in user with `token`.
pub fn storage_with_session(token: &str) -> Arc<MemoryStore> {
    let storage = Arc::new(MemoryStore::new());
    let user = serde_json::to_string(&UserProfile::new(1, "a@b.com")).unwrap();
    storage
        .set_many(&[(USER_KEY, user.as_str()), (TOKEN_KEY, token)])
        .unwrap();
    storage
}

pub fn context(base_url: &str, storage: Arc<MemoryStore>) -> AppContext {
    AppContext::with_storage(config_for(base_url), storage).unwrap()
}

pub const LOGIN_OK: &str = r#"{"token":"xyz","user":{"id":1,"email":"a@b.com","fullName":"Asha Rao"}}"#;

/// Log sink for tests that assert on emitted diagnostics.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Route `tracing` output on this thread into the sink until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
