use super::codec::{KeyError, canonical_key};
use crate::cluster::types::Backends;
use crate::fanout::protocol::Encoded;
use std::collections::BTreeMap;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a.
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in bytes {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Maps canonical keys onto backend indices.
///
/// Built from a `Backends`, so the backend count is never zero.
#[derive(Debug, Clone, Copy)]
pub struct Partitioner {
    backend_count: usize,
}

impl Partitioner {
    pub fn new(backends: &Backends) -> Self {
        Self {
            backend_count: backends.len(),
        }
    }

    pub fn backend_count(&self) -> usize {
        self.backend_count
    }

    pub fn assign(&self, canonical: &str) -> usize {
        fnv1a_32(canonical.as_bytes()) as usize % self.backend_count
    }

    /// Buckets `items` by owning backend.
    ///
    /// Only backends with at least one item get an entry; items keep their
    /// relative order within a bucket. The first key that fails to decode
    /// aborts the whole grouping.
    pub fn group<T, F>(&self, items: Vec<T>, key_of: F) -> Result<BTreeMap<usize, Vec<T>>, KeyError>
    where
        F: Fn(&T) -> &Encoded,
    {
        let mut buckets: BTreeMap<usize, Vec<T>> = BTreeMap::new();
        for item in items {
            let canonical = canonical_key(key_of(&item))?;
            let idx = self.assign(&canonical);
            buckets.entry(idx).or_default().push(item);
        }
        Ok(buckets)
    }
}
