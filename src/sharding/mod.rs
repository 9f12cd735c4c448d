//! Sharding Module
//!
//! Decides which backend owns a key.
//!
//! ## Pipeline
//! 1. **Codec** (`codec`): turns a wire key into its canonical string. Binary
//!    keys are normalised to standard base64, everything else is used as-is.
//! 2. **Partitioner** (`partitioner`): hashes the canonical string with 32-bit
//!    FNV-1a and reduces it modulo the backend count.
//!
//! Both steps are pure; the same key always lands on the same backend for a
//! given backend list.

pub mod codec;
pub mod partitioner;
