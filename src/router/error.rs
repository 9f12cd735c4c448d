use crate::fanout::protocol::{ErrorResponse, STATUS_CLIENT_ERROR, STATUS_SERVER_ERROR};
use crate::sharding::codec::KeyError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub const MSG_NOT_FOUND: &str = "Request not found.";
pub const MSG_BAD_KEY: &str = "Bad key encoding.";
pub const MSG_BAD_BODY: &str = "Bad request body.";
pub const MSG_ENCODE: &str = "Failed to encode backend request.";

/// Failures reported to the client before any backend is contacted.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("no route for {method} {path}")]
    NotFound { method: String, path: String },

    #[error("bad key encoding: {0}")]
    BadKeyEncoding(#[from] KeyError),

    #[error("bad request body: {0}")]
    BadBody(#[source] serde_json::Error),

    #[error("failed to encode backend request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("no backend at shard index {0}")]
    UnknownBackend(usize),
}

impl RouteError {
    pub fn code(&self) -> u16 {
        match self {
            RouteError::NotFound { .. } | RouteError::BadKeyEncoding(_) | RouteError::BadBody(_) => {
                STATUS_CLIENT_ERROR
            }
            RouteError::Encode(_) | RouteError::UnknownBackend(_) => STATUS_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            RouteError::NotFound { .. } => MSG_NOT_FOUND,
            RouteError::BadKeyEncoding(_) => MSG_BAD_KEY,
            RouteError::BadBody(_) => MSG_BAD_BODY,
            RouteError::Encode(_) | RouteError::UnknownBackend(_) => MSG_ENCODE,
        }
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let code = self.code();
        if code >= STATUS_SERVER_ERROR {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("{}", self);
        }
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            Json(ErrorResponse {
                code,
                message: self.message().to_string(),
            }),
        )
            .into_response()
    }
}
