//! API client for communicating with the budgetbaba REST API.
//!
//! This module provides the `ApiClient` struct. Every call runs through the
//! `RequestPipeline`: the token is attached before dispatch and failures are
//! inspected (and re-raised) afterwards. Nothing is retried automatically.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::pipeline::RequestPipeline;
use super::ApiError;
use crate::models::{
    filter_by_type, Category, CategoryRequest, CategoryType, DashboardSummary, FilterRequest,
    LoginRequest, LoginResponse, MessageResponse, NewTransaction, RegisterRequest, ReportRequest,
    Transaction, TransactionKind, UserProfile,
};

// ============================================================================
// Constants
// ============================================================================

/// Production API origin and version prefix.
pub const DEFAULT_BASE_URL: &str = "https://budgetbaba-api.onrender.com/api/v1.0";

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub mod endpoints {
    pub const LOGIN: &str = "/login";
    pub const REGISTER: &str = "/register";
    pub const HEALTH: &str = "/health";
    pub const CATEGORIES: &str = "/categories";
    pub const INCOMES: &str = "/incomes";
    pub const EXPENSES: &str = "/expenses";
    pub const DASHBOARD: &str = "/dashboard";
    pub const FILTER: &str = "/filter";
    pub const SEND_REPORT: &str = "/reports/send";

    pub fn category(id: i64) -> String {
        format!("{}/{}", CATEGORIES, id)
    }

    pub fn income(id: i64) -> String {
        format!("{}/{}", INCOMES, id)
    }

    pub fn expense(id: i64) -> String {
        format!("{}/{}", EXPENSES, id)
    }
}

/// API client for budgetbaba.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    pipeline: RequestPipeline,
}

impl ApiClient {
    /// Create a client for `base_url` with JSON default headers.
    pub fn new(base_url: &str, timeout: Duration, pipeline: RequestPipeline) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            pipeline,
        })
    }

    pub fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Dispatch one request through both interceptors.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        let headers = self.pipeline.authorize(path)?;

        let mut request = self.client.request(method.clone(), self.url(path)).headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(method = %method, path = %path, "Sending request");
        let result = match request.send().await {
            Ok(response) => Self::check_response(response).await,
            Err(e) => Err(ApiError::from_transport(e)),
        };

        if let Err(ref err) = result {
            self.pipeline.inspect_failure(path, err);
        }
        result
    }

    async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let response = self
            .send(method.clone(), path, body)
            .await
            .with_context(|| format!("Failed to send {} request to {}", method, path))?;

        // Reading the body can still time out after a 2xx status
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                let err = ApiError::from_transport(e);
                self.pipeline.inspect_failure(path, &err);
                return Err(err).with_context(|| format!("Failed to read response from {}", path));
            }
        };

        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T> {
        self.request(Method::POST, path, Some(body)).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T> {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// DELETE ignores the response body; servers answer with 200 or 204.
    async fn delete(&self, path: &str) -> Result<()> {
        self.send::<()>(Method::DELETE, path, None)
            .await
            .with_context(|| format!("Failed to send DELETE request to {}", path))?;
        Ok(())
    }

    // ===== Account =====

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        self.post(endpoints::LOGIN, request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<UserProfile> {
        self.post(endpoints::REGISTER, request).await
    }

    /// Succeeds when the API answers its health check with a 2xx.
    pub async fn health(&self) -> Result<()> {
        self.send::<()>(Method::GET, endpoints::HEALTH, None)
            .await
            .context("Health check failed")?;
        Ok(())
    }

    // ===== Categories =====

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.get(endpoints::CATEGORIES).await
    }

    /// Categories of one type; filtering happens client-side.
    pub async fn list_categories_by_type(&self, kind: CategoryType) -> Result<Vec<Category>> {
        Ok(filter_by_type(self.list_categories().await?, kind))
    }

    pub async fn create_category(&self, request: &CategoryRequest) -> Result<Category> {
        self.post(endpoints::CATEGORIES, request).await
    }

    pub async fn update_category(&self, id: i64, request: &CategoryRequest) -> Result<Category> {
        self.put(&endpoints::category(id), request).await
    }

    // ===== Incomes and expenses =====

    fn collection_path(kind: TransactionKind) -> &'static str {
        match kind {
            TransactionKind::Income => endpoints::INCOMES,
            TransactionKind::Expense => endpoints::EXPENSES,
        }
    }

    fn item_path(kind: TransactionKind, id: i64) -> String {
        match kind {
            TransactionKind::Income => endpoints::income(id),
            TransactionKind::Expense => endpoints::expense(id),
        }
    }

    pub async fn list_transactions(&self, kind: TransactionKind) -> Result<Vec<Transaction>> {
        self.get(Self::collection_path(kind)).await
    }

    pub async fn add_transaction(
        &self,
        kind: TransactionKind,
        transaction: &NewTransaction,
    ) -> Result<Transaction> {
        self.post(Self::collection_path(kind), transaction).await
    }

    pub async fn delete_transaction(&self, kind: TransactionKind, id: i64) -> Result<()> {
        self.delete(&Self::item_path(kind, id)).await
    }

    pub async fn list_incomes(&self) -> Result<Vec<Transaction>> {
        self.list_transactions(TransactionKind::Income).await
    }

    pub async fn add_income(&self, income: &NewTransaction) -> Result<Transaction> {
        self.add_transaction(TransactionKind::Income, income).await
    }

    pub async fn delete_income(&self, id: i64) -> Result<()> {
        self.delete_transaction(TransactionKind::Income, id).await
    }

    pub async fn list_expenses(&self) -> Result<Vec<Transaction>> {
        self.list_transactions(TransactionKind::Expense).await
    }

    pub async fn add_expense(&self, expense: &NewTransaction) -> Result<Transaction> {
        self.add_transaction(TransactionKind::Expense, expense).await
    }

    pub async fn delete_expense(&self, id: i64) -> Result<()> {
        self.delete_transaction(TransactionKind::Expense, id).await
    }

    // ===== Summaries and reports =====

    pub async fn dashboard(&self) -> Result<DashboardSummary> {
        self.get(endpoints::DASHBOARD).await
    }

    pub async fn filter_transactions(&self, filter: &FilterRequest) -> Result<Vec<Transaction>> {
        self.post(endpoints::FILTER, filter).await
    }

    pub async fn send_report(&self, request: &ReportRequest) -> Result<MessageResponse> {
        self.post(endpoints::SEND_REPORT, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionStore;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    fn client(base_url: &str) -> ApiClient {
        let session = Arc::new(SessionStore::new(Arc::new(MemoryStore::new())));
        ApiClient::new(base_url, Duration::from_secs(5), RequestPipeline::new(session)).unwrap()
    }

    #[test]
    fn test_url_joining() {
        let api = client("https://example.com/api/v1.0/");
        assert_eq!(api.base_url(), "https://example.com/api/v1.0");
        assert_eq!(api.url("/incomes"), "https://example.com/api/v1.0/incomes");
        assert_eq!(api.url("reports/send"), "https://example.com/api/v1.0/reports/send");
    }

    #[test]
    fn test_item_paths() {
        assert_eq!(ApiClient::item_path(TransactionKind::Income, 4), "/incomes/4");
        assert_eq!(ApiClient::item_path(TransactionKind::Expense, 9), "/expenses/9");
        assert_eq!(endpoints::category(2), "/categories/2");
    }
}
