//! HTTP client for the assistant API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use super::{
    AssistantBackend,
    error::{ApiError, Result},
    types::{
        AskRequest, AskResponse, AssistantSummary, CreateThreadResponse, ListAssistantsResponse,
        ListVectorStoresResponse, VectorStoreSummary,
    },
};

const JSON: &str = "application/json";

/// HTTP client for the assistant API.
///
/// # Example
///
/// ```rust,no_run
/// use assistant_chat::api::{AssistantBackend, Client};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new("http://localhost:8000")?;
///
/// let assistants = client.list_assistants().await?;
/// let thread_id = client.create_thread().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Root of the API (e.g., "http://localhost:8000"). Endpoint
    ///   paths are appended below it, so a base with a path prefix keeps it.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a new client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, http)
    }

    /// Create a new client with a custom reqwest client.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url, http })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            let body = response.bytes().await?;
            Ok(serde_json::from_slice(&body)?)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            Err(ApiError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl AssistantBackend for Client {
    async fn list_assistants(&self) -> Result<Vec<AssistantSummary>> {
        let response = self
            .http
            .get(self.url("list-assistants")?)
            .header(CONTENT_TYPE, JSON)
            .send()
            .await?;
        let body: ListAssistantsResponse = Self::handle_response(response).await?;
        Ok(body.assistants)
    }

    async fn list_vector_stores(&self) -> Result<Vec<VectorStoreSummary>> {
        let response = self
            .http
            .get(self.url("list-vector-stores")?)
            .header(CONTENT_TYPE, JSON)
            .send()
            .await?;
        let body: ListVectorStoresResponse = Self::handle_response(response).await?;
        Ok(body.vector_stores)
    }

    async fn create_thread(&self) -> Result<String> {
        let response = self
            .http
            .post(self.url("create-thread")?)
            .header(CONTENT_TYPE, JSON)
            .send()
            .await?;
        let body: CreateThreadResponse = Self::handle_response(response).await?;
        Ok(body.thread_id)
    }

    async fn ask(&self, request: &AskRequest) -> Result<String> {
        let response = self
            .http
            .post(self.url("ask/assistant")?)
            .json(request)
            .send()
            .await?;
        let body: AskResponse = Self::handle_response(response).await?;
        Ok(body.response)
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}
