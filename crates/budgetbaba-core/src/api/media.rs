//! Image upload to the third-party media host.
//!
//! Profile photos and category icons are uploaded here and referenced by URL
//! afterwards. This host is not the budget API: requests carry no bearer
//! token and failures never touch the session.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::ApiError;

/// Base URL of the media host's upload API
const MEDIA_API_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
}

#[derive(Clone)]
pub struct MediaUploader {
    client: Client,
    upload_url: String,
    upload_preset: String,
}

impl MediaUploader {
    pub fn new(cloud_name: &str, upload_preset: &str, timeout: Duration) -> Result<Self> {
        Self::with_upload_url(
            format!("{}/{}/image/upload", MEDIA_API_BASE, cloud_name),
            upload_preset,
            timeout,
        )
    }

    /// Point the uploader at an explicit endpoint (self-hosted or test server).
    pub fn with_upload_url(upload_url: String, upload_preset: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build media upload client")?;
        Ok(Self {
            client,
            upload_url,
            upload_preset: upload_preset.to_string(),
        })
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    /// Upload an image file and return its hosted URL
    pub async fn upload_file(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read image {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        self.upload_bytes(&file_name, bytes).await
    }

    pub async fn upload_bytes(&self, file_name: &str, bytes: Vec<u8>) -> Result<String> {
        debug!(file = %file_name, size = bytes.len(), "Uploading image");

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime_guess::from_path(file_name).first_or_octet_stream().as_ref())
            .context("Invalid image content type")?;
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::from_transport)
            .context("Failed to send image upload")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body)).context("Image upload rejected");
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .context("Failed to parse image upload response")?;

        let url = parsed
            .secure_url
            .or(parsed.url)
            .ok_or_else(|| ApiError::InvalidResponse("upload response has no URL".to_string()))?;

        info!(url = %url, "Image uploaded");
        Ok(url)
    }
}
