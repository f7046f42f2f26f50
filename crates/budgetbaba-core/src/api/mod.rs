//! REST API client module for the budgetbaba service.
//!
//! This module provides:
//! - `ApiClient`: typed calls for categories, incomes, expenses, dashboard,
//!   filtering and emailed reports
//! - `RequestPipeline`: bearer-token attachment and failure handling shared
//!   by every call
//! - `MediaUploader`: image uploads to the third-party media host
//!
//! The API uses bearer token authentication obtained from `/login`.

pub mod client;
pub mod error;
pub mod media;
pub mod pipeline;

pub use client::{endpoints, ApiClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use error::{user_message, ApiError};
pub use media::MediaUploader;
pub use pipeline::{PipelineEvent, RequestPipeline, PUBLIC_ENDPOINTS};
