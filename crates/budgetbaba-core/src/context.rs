//! Application context shared by every command.
//!
//! `AppContext` is built once at startup and passed explicitly to whatever
//! needs the session or the API. It wires durable storage into the session
//! store, the session store into the request pipeline and the pipeline into
//! the API client.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::{ApiClient, MediaUploader, PipelineEvent, RequestPipeline};
use crate::auth::{SessionError, SessionState, SessionStore};
use crate::config::Config;
use crate::models::{
    LoginRequest, MessageResponse, RegisterRequest, ReportRequest, TransactionKind, UserProfile,
};
use crate::storage::{FileStore, KeyValueStore};
use crate::validate;

pub struct AppContext {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub api: ApiClient,
    pub media: MediaUploader,
}

impl AppContext {
    /// Open persistent storage in the configured data directory and restore the session.
    pub fn new(config: Config) -> Result<Self> {
        let data_dir = config.data_dir()?;
        let storage = FileStore::open(&data_dir)
            .with_context(|| format!("Failed to open storage in {}", data_dir.display()))?;
        Self::with_storage(config, Arc::new(storage))
    }

    pub fn with_storage(config: Config, storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        let session = Arc::new(SessionStore::new(storage));
        let state = session.initialize();
        debug!(authenticated = state.is_authenticated(), "Session initialized");

        let pipeline = RequestPipeline::new(session.clone());
        let timeout = config.request_timeout();
        let api = ApiClient::new(&config.api_base_url, timeout, pipeline)?;
        let media = MediaUploader::new(&config.media_cloud_name, &config.media_upload_preset, timeout)?;

        Ok(Self {
            config,
            session,
            api,
            media,
        })
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<PipelineEvent> {
        self.api.pipeline().subscribe()
    }

    /// Validate the form, authenticate, and store the returned user/token pair.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<UserProfile> {
        validate::validate_login(email, password)?;

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self.api.login(&request).await?;

        self.session
            .login(response.user.clone(), response.token)
            .context("Failed to save session")?;

        self.config.last_email = Some(request.email);
        Ok(response.user)
    }

    /// Validate the form, upload the optional profile photo, then create the account.
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
        photo: Option<&Path>,
    ) -> Result<UserProfile> {
        validate::validate_registration(full_name, email, password)?;

        let profile_image_url = match photo {
            Some(path) => self.media.upload_file(path).await?,
            None => String::new(),
        };

        let request = RegisterRequest {
            full_name: full_name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
            profile_image_url,
        };
        let user = self.api.register(&request).await?;
        info!(email = %user.email, "Account registered");
        Ok(user)
    }

    pub fn logout(&self) -> Result<()> {
        self.session.logout()?;
        Ok(())
    }

    /// Email a report of incomes or expenses to the logged-in user.
    pub async fn send_report(&self, kind: TransactionKind) -> Result<MessageResponse> {
        let user = self.session.user().ok_or(SessionError::NotLoggedIn)?;
        let request = ReportRequest {
            kind,
            email: user.email,
            profile_id: user.id,
        };
        self.api.send_report(&request).await
    }
}
