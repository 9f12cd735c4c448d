use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::config::ConfigError;

/// A single downstream key-value server.
///
/// Field names follow the `servers.json` layout (`{"ip": ..., "port": ...}`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Backend {
    pub ip: String,
    pub port: u16,
}

impl Backend {
    pub fn new(ip: impl Into<String>, port: u16) -> Self {
        Self {
            ip: ip.into(),
            port,
        }
    }

    /// Full URL of `endpoint` on this backend, e.g. `http://10.0.0.1:9000/fetch`.
    pub fn url(&self, endpoint: &str) -> String {
        format!("http://{}:{}{}", self.ip, self.port, endpoint)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

/// The ordered backend list.
///
/// Construction rejects an empty list, so every holder of a `Backends` can
/// shard by `len()` without a zero check. The list is never mutated after
/// construction; clones share the same allocation.
#[derive(Debug, Clone)]
pub struct Backends {
    inner: Arc<[Backend]>,
}

impl Backends {
    pub fn new(backends: Vec<Backend>) -> Result<Self, ConfigError> {
        if backends.is_empty() {
            return Err(ConfigError::NoBackends);
        }
        Ok(Self {
            inner: backends.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    // Always false; exists to satisfy clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Backend> {
        self.inner.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Backend> {
        self.inner.iter()
    }
}
