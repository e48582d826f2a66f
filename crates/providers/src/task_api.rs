//! HTTP client for the remote task service (`/chat`, `/search`, `/pdf`).
//!
//! Every operation reports failure as a single [`ApiFailure`] carrying a
//! human-readable reason. Transport errors, timeouts, `success: false`
//! replies and malformed payloads all end up in that one shape.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use shared::settings::ClientSettings;
use shared::{Document, SearchResult, SearchSource, Stage};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

static SHARED_HTTP: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(2)
        .build()
        .expect("failed to build HTTP client")
});

/// Uniform failure returned by every [`TaskApi`] operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct ApiFailure {
    pub reason: String,
}

impl ApiFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error("request timed out")]
    Timeout,
    #[error("request failed: {0}")]
    Transport(reqwest::Error),
    #[error("server returned HTTP {0}")]
    Status(StatusCode),
    #[error("{0}")]
    Rejected(String),
    #[error("unexpected response: {0}")]
    Malformed(String),
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::Malformed(e.to_string())
        } else {
            ApiError::Transport(e)
        }
    }
}

impl From<ApiError> for ApiFailure {
    fn from(e: ApiError) -> Self {
        ApiFailure::new(e.to_string())
    }
}

/// Everything the service needs to answer one chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    pub stage: Stage,
    /// Newline-joined search result summaries, may be empty
    pub context: String,
    /// Truncated text of each uploaded document
    pub documents: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatBody<'a> {
    message: &'a str,
    session_id: &'a str,
    stage: &'static str,
    context: &'a str,
    documents: &'a [String],
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    success: bool,
    response: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchReply {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct ExtractReply {
    #[serde(default)]
    success: bool,
    text: Option<String>,
    metadata: Option<ExtractMetadata>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExtractMetadata {
    filename: String,
    pages: u32,
}

/// The three remote operations the client depends on.
///
/// Note: Uses async_trait for object safety
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn chat(&self, request: ChatRequest) -> Result<String, ApiFailure>;

    async fn search(
        &self,
        query: &str,
        source: SearchSource,
    ) -> Result<Vec<SearchResult>, ApiFailure>;

    async fn extract_pdf(&self, path: &Path) -> Result<Document, ApiFailure>;
}

pub struct TaskApiClient {
    http: Client,
    base: String,
    session_id: String,
    chat_timeout: Duration,
    search_timeout: Duration,
    extract_timeout: Duration,
    search_count: u32,
}

impl TaskApiClient {
    pub fn new(settings: &ClientSettings, session_id: impl Into<String>) -> Self {
        Self {
            http: SHARED_HTTP.clone(),
            base: settings.api_url.trim_end_matches('/').to_string(),
            session_id: session_id.into(),
            chat_timeout: Duration::from_secs(settings.chat_timeout_secs),
            search_timeout: Duration::from_secs(settings.search_timeout_secs),
            extract_timeout: Duration::from_secs(settings.extract_timeout_secs),
            search_count: settings.search_result_count,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    async fn post_chat(&self, request: &ChatRequest) -> Result<String, ApiError> {
        let body = ChatBody {
            message: &request.message,
            session_id: &self.session_id,
            stage: request.stage.as_str(),
            context: &request.context,
            documents: &request.documents,
        };
        let resp = self
            .http
            .post(format!("{}/chat", self.base))
            .timeout(self.chat_timeout)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;
        let reply: ChatReply = decode_reply(status, &text)?;

        if !reply.success {
            return Err(rejection(status, reply.error, "Unknown error"));
        }
        reply
            .response
            .ok_or_else(|| ApiError::Malformed("reply has no response text".to_string()))
    }

    async fn get_search(
        &self,
        query: &str,
        source: SearchSource,
    ) -> Result<Vec<SearchResult>, ApiError> {
        let num = self.search_count.to_string();
        let resp = self
            .http
            .get(format!("{}/search", self.base))
            .timeout(self.search_timeout)
            .query(&[("q", query), ("num", num.as_str()), ("source", source.as_str())])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status()));
        }
        let reply: SearchReply = resp.json().await?;
        Ok(reply.results)
    }

    async fn post_pdf(&self, path: &Path) -> Result<Document, ApiError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "document.pdf".to_string());
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);

        let resp = self
            .http
            .post(format!("{}/pdf", self.base))
            .timeout(self.extract_timeout)
            .multipart(form)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;
        let reply: ExtractReply = decode_reply(status, &text)?;

        if !reply.success {
            return Err(rejection(status, reply.error, "extraction failed"));
        }
        match (reply.text, reply.metadata) {
            (Some(content), Some(meta)) => Ok(Document::new(meta.filename, content, meta.pages)),
            _ => Err(ApiError::Malformed(
                "reply is missing text or metadata".to_string(),
            )),
        }
    }
}

/// Parse a `{success, ...}` reply. The service reports application errors
/// in the body even on non-2xx statuses, so the body wins when it parses.
fn decode_reply<T: serde::de::DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        if status.is_success() {
            ApiError::Malformed(e.to_string())
        } else {
            ApiError::Status(status)
        }
    })
}

/// A body without `success: true`. Its `error` text wins; with no text, a
/// non-2xx status is reported as such rather than the generic fallback.
fn rejection(status: StatusCode, error: Option<String>, fallback: &str) -> ApiError {
    match error {
        Some(reason) => ApiError::Rejected(reason),
        None if !status.is_success() => ApiError::Status(status),
        None => ApiError::Rejected(fallback.to_string()),
    }
}

#[async_trait]
impl TaskApi for TaskApiClient {
    async fn chat(&self, request: ChatRequest) -> Result<String, ApiFailure> {
        tracing::debug!(
            stage = request.stage.as_str(),
            docs = request.documents.len(),
            "POST /chat"
        );
        Ok(self.post_chat(&request).await?)
    }

    async fn search(
        &self,
        query: &str,
        source: SearchSource,
    ) -> Result<Vec<SearchResult>, ApiFailure> {
        tracing::debug!(source = source.as_str(), "GET /search");
        Ok(self.get_search(query, source).await?)
    }

    async fn extract_pdf(&self, path: &Path) -> Result<Document, ApiFailure> {
        tracing::debug!(path = %path.display(), "POST /pdf");
        Ok(self.post_pdf(path).await?)
    }
}
