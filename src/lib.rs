//! Shard Router Library
//!
//! A sharding router in front of a fixed set of independent key-value
//! backends. Clients talk to one endpoint; the router partitions each request
//! by key, fans the pieces out to the owning backends concurrently and merges
//! the replies into a single response.
//!
//! ## Architecture Modules
//! - **`cluster`**: The immutable backend list and startup configuration
//!   (`servers.json` or `host:port` arguments).
//! - **`sharding`**: Key canonicalisation and FNV-1a based key -> backend
//!   assignment.
//! - **`fanout`**: Wire protocol, the backend HTTP client, the concurrent
//!   dispatcher and the per-operation response aggregators.
//! - **`router`**: The client-facing HTTP surface and per-request
//!   orchestration.

pub mod cluster;
pub mod fanout;
pub mod router;
pub mod sharding;

#[cfg(test)]
mod testing;
