//! clipsync - HTTP client for the read/write surface

use reqwest::header::HeaderMap;
use reqwest::StatusCode;

use crate::clipboard::ClipboardValue;
use crate::server::ContentPayload;

/// HTTP client error type
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Unexpected status {0}: {1}")]
    Status(u16, String),
}

/// Raw response of a write, kept for logging
#[derive(Debug)]
pub struct WriteResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl WriteResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Client for `GET /read` and `POST /write`
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the server's current value
    pub async fn read(&self) -> Result<ClipboardValue, HttpError> {
        let response = self
            .client
            .get(format!("{}/read", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpError::Status(status.as_u16(), body));
        }

        let payload: ContentPayload = response.json().await?;
        Ok(payload.content)
    }

    /// Post `{"content": value}`
    ///
    /// Any HTTP status is returned as a response; only transport failures
    /// are errors.
    pub async fn write(&self, value: &ClipboardValue) -> Result<WriteResponse, HttpError> {
        let payload = ContentPayload {
            content: value.clone(),
        };
        self.post_write(&payload).await
    }

    /// Post an arbitrary JSON body to `/write`
    pub async fn write_raw(&self, body: impl Into<String>) -> Result<WriteResponse, HttpError> {
        let response = self
            .client
            .post(format!("{}/write", self.base_url))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .send()
            .await?;
        Self::collect(response).await
    }

    async fn post_write(&self, payload: &ContentPayload) -> Result<WriteResponse, HttpError> {
        let response = self
            .client
            .post(format!("{}/write", self.base_url))
            .json(payload)
            .send()
            .await?;
        Self::collect(response).await
    }

    async fn collect(response: reqwest::Response) -> Result<WriteResponse, HttpError> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        Ok(WriteResponse {
            status,
            headers,
            body,
        })
    }
}
