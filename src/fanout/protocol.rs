//! Router Wire Protocol
//!
//! Defines the endpoints, status codes and JSON Data Transfer Objects shared by
//! the client-facing API and the router -> backend requests.
//!
//! Backends expose the same three endpoints as the router and answer with the
//! same reply shapes, so one set of DTOs serves both directions.

use serde::{Deserialize, Serialize};

// --- Endpoints ---

/// Fetch every pair (`GET`) or the listed keys (`POST`).
pub const ENDPOINT_FETCH: &str = "/fetch";
/// Existence check for the listed keys (`POST`).
pub const ENDPOINT_QUERY: &str = "/query";
/// Store the listed pairs (`PUT`).
pub const ENDPOINT_SET: &str = "/set";

// --- Status codes ---

pub const STATUS_SUCCESS: u16 = 200;
pub const STATUS_PARTIAL: u16 = 206;
pub const STATUS_CLIENT_ERROR: u16 = 405;
pub const STATUS_SERVER_ERROR: u16 = 500;

// --- Data Transfer Objects ---

/// An encoded blob; used for every key and value on the wire.
///
/// `encoding` is `"binary"` for raw bytes or any other tag for text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Encoded {
    pub encoding: String,
    pub data: String,
}

impl Encoded {
    pub fn new(encoding: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            encoding: encoding.into(),
            data: data.into(),
        }
    }

    pub fn text(data: impl Into<String>) -> Self {
        Self::new("string", data)
    }
}

/// Client `POST /fetch` and `POST /query` item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyRequest {
    pub key: Encoded,
}

/// Client `PUT /set` item; forwarded unchanged to the owning backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetRequest {
    pub key: Encoded,
    pub value: Encoded,
}

/// One `/fetch` reply entry. `value` is `null` for an unknown key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchItem {
    pub key: Encoded,
    pub value: Option<Encoded>,
}

/// One `/query` reply entry; `value` tells whether the key exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct QueryItem {
    pub key: Encoded,
    pub value: bool,
}

/// `/set` reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SetResponse {
    pub keys_added: u64,
    pub keys_failed: Vec<Encoded>,
}

/// Body of every client error reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}
