//! Request Router Module
//!
//! The client-facing HTTP surface of the shard router.
//!
//! | Method | Path     | Body                 | Reply                        |
//! |--------|----------|----------------------|------------------------------|
//! | GET    | `/fetch` | none                 | `[{key, value}]`             |
//! | POST   | `/fetch` | `[{key}]`            | `[{key, value}]`             |
//! | POST   | `/query` | `[{key}]`            | `[{key, value: bool}]`       |
//! | PUT    | `/set`   | `[{key, value}]`     | `{keys_added, keys_failed}`  |
//!
//! Replies are `200` when every backend fully answered, `206` when any backend
//! was unreachable, failed or reported partial success, and `500` only when the
//! merged reply could not be encoded. Client mistakes are answered with `405`
//! and a `{code, message}` body without touching any backend.
//!
//! ## Submodules
//! - **`service`**: Decode -> partition -> dispatch -> aggregate orchestration.
//! - **`handlers`**: Axum handlers and the route table.
//! - **`error`**: Client-visible error taxonomy.

pub mod error;
pub mod handlers;
pub mod service;
