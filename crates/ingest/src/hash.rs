use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of an in-memory document (64 chars).
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
