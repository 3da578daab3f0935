//! Cache key derivation
//!
//! The key is a SHA-256 digest over the request fields in a fixed order
//! (url, output token, quality, resolution, version) joined with the ASCII
//! unit separator.

use sha2::{Digest, Sha256};

use crate::models::{CacheKey, TransformRequest};

const FIELD_SEPARATOR: char = '\u{1f}';

/// Derive the cache key for a request
///
/// Infallible. An unset output hashes as the empty token, so it keys a
/// different entry than the same request with the format spelled out.
pub fn derive_key(request: &TransformRequest) -> CacheKey {
    let quality = request.quality.to_string();
    let fields = [
        request.source_url.as_str(),
        request.output_token(),
        quality.as_str(),
        request.resolution.as_str(),
        request.version.as_str(),
    ];

    let mut hasher = Sha256::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            let mut buf = [0u8; 4];
            hasher.update(FIELD_SEPARATOR.encode_utf8(&mut buf).as_bytes());
        }
        hasher.update(field.as_bytes());
    }

    CacheKey::from_digest(hex::encode(hasher.finalize()))
}
