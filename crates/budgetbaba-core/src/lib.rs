//! Core library for budgetbaba, a personal budget tracker client.
//!
//! The remote API owns all business data. This crate holds the client side:
//!
//! - `auth`: the session store, the single owner of who is logged in
//! - `storage`: durable key-value storage mirroring the session
//! - `api`: the request pipeline, the typed API client and image uploads
//! - `context`: `AppContext`, built once at startup and passed explicitly
//! - `models`, `validate`, `config`, `utils`: data types, form checks,
//!   settings and display helpers

pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod models;
pub mod storage;
pub mod utils;
pub mod validate;

pub use api::{ApiClient, ApiError, MediaUploader, PipelineEvent, RequestPipeline};
pub use auth::{SessionData, SessionError, SessionState, SessionStore};
pub use config::Config;
pub use context::AppContext;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use validate::ValidationError;
