//! Transport abstraction
//!
//! The network is a narrow seam: send a multipart body, get response
//! bytes back. The HTTP implementation covers production; the in-memory
//! one records requests for tests.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

/// Transport errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
}

/// Performs one upload request: POST a multipart body, return the
/// response bytes.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_multipart(
        &self,
        url: &Url,
        boundary: &str,
        body: Bytes,
    ) -> Result<Bytes, TransportError>;
}

/// HTTP transport backed by a shared reqwest client.
#[derive(Debug, Default, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, body), fields(url = %url, bytes = body.len()))]
    async fn post_multipart(
        &self,
        url: &Url,
        boundary: &str,
        body: Bytes,
    ) -> Result<Bytes, TransportError> {
        let response = self
            .client
            .post(url.as_str())
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?
            .error_for_status()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let payload = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        debug!(response_bytes = payload.len(), "upload response received");
        Ok(payload)
    }
}

/// One request as observed by [`MemoryTransport`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: Url,
    pub boundary: String,
    pub body: Bytes,
}

/// In-memory transport for testing.
///
/// Records every successful send; optionally fails once a configured
/// number of requests has been served.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    requests: tokio::sync::Mutex<Vec<RecordedRequest>>,
    fail_after: Option<usize>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that serves `n` requests and fails every one after.
    pub fn failing_after(n: usize) -> Self {
        Self {
            requests: tokio::sync::Mutex::new(Vec::new()),
            fail_after: Some(n),
        }
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn post_multipart(
        &self,
        url: &Url,
        boundary: &str,
        body: Bytes,
    ) -> Result<Bytes, TransportError> {
        let mut requests = self.requests.lock().await;
        if let Some(limit) = self.fail_after {
            if requests.len() >= limit {
                return Err(TransportError::Network(
                    "injected transport failure".to_string(),
                ));
            }
        }
        requests.push(RecordedRequest {
            url: url.clone(),
            boundary: boundary.to_string(),
            body,
        });
        Ok(Bytes::from_static(b"{\"status\":\"ok\"}"))
    }
}
