use crate::fanout::protocol::Encoded;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Encoding tag for keys whose `data` carries raw bytes.
pub const BINARY_ENCODING: &str = "binary";

#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("key encoding '{encoding}' could not be decoded: {reason}")]
    BadEncoding { encoding: String, reason: String },
}

/// Returns the canonical string a key is hashed by.
///
/// Binary keys hash by the standard base64 form of their bytes; any other
/// encoding hashes by the data string itself. No input currently fails, but
/// callers must treat `Err` as a client error.
pub fn canonical_key(key: &Encoded) -> Result<String, KeyError> {
    if key.encoding == BINARY_ENCODING {
        Ok(STANDARD.encode(key.data.as_bytes()))
    } else {
        Ok(key.data.clone())
    }
}
