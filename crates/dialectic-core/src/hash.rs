//! Content hashing for deterministic scene plans.
//!
//! Produces a SHA-256 hash of a serialized scene plan so that two builds of
//! the same script can be compared without diffing JSON.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// A content hash digest (SHA-256, 32 bytes).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash {
    bytes: [u8; 32],
}

impl ContentHash {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Get the hash as a hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Short prefix used in log lines.
    pub fn short(&self) -> String {
        self.to_hex()[..12].to_string()
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Hash a raw byte slice.
pub fn hash_bytes(data: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    // Length prefix keeps concatenated inputs from colliding.
    hasher.update((data.len() as u64).to_le_bytes());
    hasher.update(data);
    let result = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&result);
    ContentHash::from_bytes(bytes)
}

/// Hash the canonical JSON form of any serializable value.
pub fn hash_json<T: Serialize>(value: &T) -> Result<ContentHash, serde_json::Error> {
    let encoded = serde_json::to_vec(value)?;
    Ok(hash_bytes(&encoded))
}
