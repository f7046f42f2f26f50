//! Request/response interception shared by every API call.
//!
//! The pipeline attaches the bearer token to outgoing requests and reacts to
//! failed responses. On a 401 it purges the session through the
//! `SessionStore` and broadcasts `PipelineEvent::LoginRequired`; the
//! application shell decides how to get the user back to the login flow.

use std::sync::Arc;

use reqwest::header::{self, HeaderMap, HeaderValue};
use tokio::sync::broadcast;
use tracing::{debug, error, warn};

use super::ApiError;
use crate::auth::SessionStore;

/// Paths reachable without a credential. Matched as substrings of the request path.
pub const PUBLIC_ENDPOINTS: [&str; 5] = ["/login", "/register", "/status", "/activate", "/health"];

/// Buffer size for the pipeline event channel.
const EVENT_BUFFER_SIZE: usize = 16;

/// Side effects the pipeline reports to whoever owns navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// The server rejected the session credential on `path`; the session has been cleared.
    LoginRequired { path: String },
}

/// Cloning shares the session and the event channel.
#[derive(Clone)]
pub struct RequestPipeline {
    session: Arc<SessionStore>,
    events: broadcast::Sender<PipelineEvent>,
}

impl RequestPipeline {
    pub fn new(session: Arc<SessionStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self { session, events }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.events.subscribe()
    }

    pub fn is_public(path: &str) -> bool {
        PUBLIC_ENDPOINTS.iter().any(|endpoint| path.contains(endpoint))
    }

    /// Request interceptor: headers to add before dispatching a request to `path`.
    ///
    /// No token is not an error here; the server decides whether the call needs one.
    pub fn authorize(&self, path: &str) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        if Self::is_public(path) {
            return Ok(headers);
        }

        if let Some(token) = self.session.token() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::InvalidRequest("token is not a valid header value".to_string()))?;
            headers.insert(header::AUTHORIZATION, value);
        } else {
            debug!(path = %path, "No session token, sending request without Authorization");
        }
        Ok(headers)
    }

    /// Response interceptor for failures. The caller still returns `err` afterwards.
    pub fn inspect_failure(&self, path: &str, err: &ApiError) {
        match err.status() {
            Some(401) => {
                warn!(path = %path, "Unauthorized response, ending session");
                if let Err(e) = self.session.expire() {
                    error!(error = %e, "Failed to purge expired session");
                }
                // No receivers just means nobody is listening yet
                let _ = self.events.send(PipelineEvent::LoginRequired {
                    path: path.to_string(),
                });
            }
            Some(403) => {
                warn!(path = %path, "Forbidden: no access to this resource");
            }
            Some(status) if status >= 500 => {
                error!(path = %path, status, "Server error, please try again later");
            }
            _ if err.is_timeout() => {
                warn!(path = %path, "Request timed out, please try again");
            }
            _ => {
                debug!(path = %path, error = %err, "Request failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserProfile;
    use crate::storage::{KeyValueStore, MemoryStore, TOKEN_KEY, USER_KEY};
    use reqwest::StatusCode;

    fn pipeline_with_token(token: Option<&str>) -> (Arc<MemoryStore>, RequestPipeline) {
        let storage = Arc::new(MemoryStore::new());
        let session = Arc::new(SessionStore::new(storage.clone()));
        if let Some(token) = token {
            session.login(UserProfile::new(1, "a@b.com"), token).unwrap();
        }
        (storage, RequestPipeline::new(session))
    }

    #[test]
    fn test_is_public() {
        assert!(RequestPipeline::is_public("/login"));
        assert!(RequestPipeline::is_public("/register"));
        assert!(RequestPipeline::is_public("/api/v1.0/health"));
        assert!(RequestPipeline::is_public("/activate?token=abc"));
        assert!(!RequestPipeline::is_public("/incomes"));
        assert!(!RequestPipeline::is_public("/categories/3"));
    }

    #[test]
    fn test_token_attached_to_private_path() {
        let (_, pipeline) = pipeline_with_token(Some("xyz"));
        let headers = pipeline.authorize("/incomes").unwrap();
        assert_eq!(headers.get(header::AUTHORIZATION).unwrap(), "Bearer xyz");
    }

    #[test]
    fn test_public_path_never_gets_token() {
        let (_, pipeline) = pipeline_with_token(Some("xyz"));
        for path in PUBLIC_ENDPOINTS {
            let headers = pipeline.authorize(path).unwrap();
            assert!(headers.get(header::AUTHORIZATION).is_none(), "{path}");
        }
    }

    #[test]
    fn test_missing_token_is_not_an_error() {
        let (_, pipeline) = pipeline_with_token(None);
        let headers = pipeline.authorize("/dashboard").unwrap();
        assert!(headers.is_empty());
    }

    #[test]
    fn test_unencodable_token_fails_the_request() {
        let (_, pipeline) = pipeline_with_token(Some("bad\ntoken"));
        assert!(matches!(
            pipeline.authorize("/incomes"),
            Err(ApiError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_unauthorized_purges_session_and_signals_once() {
        let (storage, pipeline) = pipeline_with_token(Some("xyz"));
        let mut events = pipeline.subscribe();

        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, "");
        pipeline.inspect_failure("/expenses", &err);

        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get(USER_KEY).unwrap(), None);
        assert!(!pipeline.session().is_authenticated());
        assert_eq!(
            events.try_recv().unwrap(),
            PipelineEvent::LoginRequired {
                path: "/expenses".to_string()
            }
        );
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_forbidden_and_server_errors_leave_session_alone() {
        let (storage, pipeline) = pipeline_with_token(Some("xyz"));
        let mut events = pipeline.subscribe();

        for status in [StatusCode::FORBIDDEN, StatusCode::INTERNAL_SERVER_ERROR] {
            pipeline.inspect_failure("/dashboard", &ApiError::from_status(status, ""));
        }
        pipeline.inspect_failure("/dashboard", &ApiError::Timeout);

        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("xyz"));
        assert!(pipeline.session().is_authenticated());
        assert!(events.try_recv().is_err());
    }
}
