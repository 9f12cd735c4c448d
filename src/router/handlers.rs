use super::error::RouteError;
use super::service::{Operation, ShardRouter};
use crate::fanout::aggregator::AggregateResult;
use crate::fanout::protocol::{ENDPOINT_FETCH, ENDPOINT_QUERY, ENDPOINT_SET};
use axum::Router;
use axum::extract::{DefaultBodyLimit, Extension};
use axum::http::{Method, StatusCode, Uri, header::CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use bytes::Bytes;
use std::sync::Arc;
use tracing::Instrument;

impl IntoResponse for AggregateResult {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(CONTENT_TYPE, "application/json")], self.body).into_response()
    }
}

/// Client-facing route table.
///
/// Anything that is not one of the four supported method/path pairs gets the
/// JSON "Request not found." error, including known paths with the wrong
/// method. `HEAD /fetch` is rejected explicitly since axum would otherwise
/// serve it with the `GET` handler. Request bodies are not size-limited.
pub fn build_app(router: Arc<ShardRouter>) -> Router {
    Router::new()
        .route(
            ENDPOINT_FETCH,
            get(handle_fetch_all)
                .head(handle_not_found)
                .post(handle_fetch)
                .fallback(handle_not_found),
        )
        .route(ENDPOINT_QUERY, post(handle_query).fallback(handle_not_found))
        .route(ENDPOINT_SET, put(handle_set).fallback(handle_not_found))
        .fallback(handle_not_found)
        .layer(DefaultBodyLimit::disable())
        .layer(Extension(router))
}

async fn run(router: &ShardRouter, op: Operation, body: &[u8]) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("request", id = %request_id, op = op.name());

    async move {
        tracing::debug!("Received {} bytes", body.len());
        match router.handle(op, body).await {
            Ok(result) => {
                tracing::debug!("Replying {}", result.status.code());
                result.into_response()
            }
            Err(e) => e.into_response(),
        }
    }
    .instrument(span)
    .await
}

pub async fn handle_fetch_all(Extension(router): Extension<Arc<ShardRouter>>) -> Response {
    run(&router, Operation::FetchAll, &[]).await
}

pub async fn handle_fetch(Extension(router): Extension<Arc<ShardRouter>>, body: Bytes) -> Response {
    run(&router, Operation::Fetch, &body).await
}

pub async fn handle_query(Extension(router): Extension<Arc<ShardRouter>>, body: Bytes) -> Response {
    run(&router, Operation::Query, &body).await
}

pub async fn handle_set(Extension(router): Extension<Arc<ShardRouter>>, body: Bytes) -> Response {
    run(&router, Operation::Set, &body).await
}

pub async fn handle_not_found(method: Method, uri: Uri) -> Response {
    RouteError::NotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
    .into_response()
}
