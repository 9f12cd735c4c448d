//! Backend Cluster Module
//!
//! Describes the fixed set of key-value backends the router shards across.
//!
//! ## Core Concepts
//! - **Backend**: One downstream server, addressed by `ip:port`.
//! - **Backends**: The ordered, non-empty, immutable backend list. A backend's
//!   position in the list is its shard index.
//! - **Configuration**: The list is loaded once at startup, either from
//!   `host:port` command-line arguments or from a JSON file (`servers.json`).

pub mod config;
pub mod types;
