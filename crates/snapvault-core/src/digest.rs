//! Content digest helpers
//!
//! All content addressing uses SHA-256, rendered as 64-char lowercase hex.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 digest of a byte slice, hex-encoded
pub fn digest_hex(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let result = hasher.finalize();
    hex::encode(result)
}
