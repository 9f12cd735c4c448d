use super::client::{BackendClient, BackendError, BackendReply};
use crate::cluster::types::Backend;
use bytes::Bytes;
use reqwest::Method;
use std::sync::Arc;
use tokio::sync::Mutex;

/// One outbound request of a fan-out.
#[derive(Debug, Clone)]
pub struct SubRequest {
    /// Shard index of the target backend.
    pub index: usize,
    pub backend: Backend,
    pub method: Method,
    pub endpoint: &'static str,
    pub body: Option<Bytes>,
}

/// What came back from one backend.
#[derive(Debug)]
pub struct BackendResult {
    pub index: usize,
    pub outcome: Result<BackendReply, BackendError>,
}

impl BackendResult {
    pub fn reply(index: usize, status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            index,
            outcome: Ok(BackendReply {
                status,
                body: body.into(),
            }),
        }
    }
}

/// Issues a batch of sub-requests concurrently and waits for all of them.
///
/// Every sub-request runs in its own task and runs to completion; a failing
/// backend never cancels the others. Results are collected in completion
/// order.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: BackendClient,
}

impl Dispatcher {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    pub async fn dispatch(&self, requests: Vec<SubRequest>) -> Vec<BackendResult> {
        let results: Arc<Mutex<Vec<BackendResult>>> =
            Arc::new(Mutex::new(Vec::with_capacity(requests.len())));

        let mut handles = Vec::with_capacity(requests.len());
        for request in requests {
            let client = self.client.clone();
            let results = results.clone();
            let index = request.index;
            let backend = request.backend.clone();

            let handle = tokio::spawn(async move {
                let outcome = client
                    .send(
                        &request.backend,
                        request.method,
                        request.endpoint,
                        request.body,
                    )
                    .await;
                match &outcome {
                    Ok(reply) => tracing::debug!(
                        "Backend {} ({}) replied {} with {} bytes",
                        request.index,
                        request.backend,
                        reply.status,
                        reply.body.len()
                    ),
                    Err(e) => tracing::warn!("Backend {} unavailable: {}", request.index, e),
                }
                results.lock().await.push(BackendResult {
                    index: request.index,
                    outcome,
                });
            });
            handles.push((index, backend, handle));
        }

        // Barrier: every task has finished (or died) past this point.
        let joined = futures::future::join_all(
            handles
                .into_iter()
                .map(|(index, backend, handle)| async move { (index, backend, handle.await) }),
        )
        .await;

        for (index, backend, joined) in joined {
            if let Err(e) = joined {
                tracing::error!("Dispatch task for backend {} failed: {}", index, e);
                results.lock().await.push(BackendResult {
                    index,
                    outcome: Err(BackendError::Aborted {
                        backend: backend.to_string(),
                        reason: e.to_string(),
                    }),
                });
            }
        }

        let mut collected = results.lock().await;
        std::mem::take(&mut *collected)
    }
}
