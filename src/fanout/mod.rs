//! Fan-Out Module
//!
//! Sends per-backend sub-requests concurrently and merges what comes back.
//!
//! ## Core Concepts
//! - **Protocol**: Endpoints, status codes and JSON DTOs shared by clients,
//!   the router and the backends.
//! - **Client**: One HTTP attempt against one backend. Transport failures are
//!   returned as typed errors, never panics.
//! - **Dispatcher**: One task per sub-request, joined before returning. Results
//!   go into a mutex-guarded buffer in completion order.
//! - **Aggregator**: Per-operation merge strategies that fold the results into
//!   a single body and a `200`/`206`/`500` status.

pub mod aggregator;
pub mod client;
pub mod dispatcher;
pub mod protocol;
