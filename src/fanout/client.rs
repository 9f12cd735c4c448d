use crate::cluster::types::Backend;
use bytes::Bytes;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request to {backend} failed: {source}")]
    Transport {
        backend: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("reading reply from {backend} failed: {source}")]
    Body {
        backend: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("task for {backend} did not complete: {reason}")]
    Aborted { backend: String, reason: String },
}

/// A backend's raw reply.
#[derive(Debug, Clone)]
pub struct BackendReply {
    pub status: u16,
    pub body: Bytes,
}

/// Thin HTTP client for the backend `/fetch`, `/query` and `/set` endpoints.
///
/// Exactly one attempt per call; there is no retry.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http_client: reqwest::Client,
    timeout: Option<Duration>,
}

impl BackendClient {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            timeout,
        }
    }

    pub async fn send(
        &self,
        backend: &Backend,
        method: Method,
        endpoint: &str,
        body: Option<Bytes>,
    ) -> Result<BackendReply, BackendError> {
        let mut request = self
            .http_client
            .request(method, backend.url(endpoint))
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.body(body);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|source| BackendError::Transport {
                backend: backend.to_string(),
                source,
            })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|source| BackendError::Body {
                backend: backend.to_string(),
                source,
            })?;

        Ok(BackendReply { status, body })
    }
}
