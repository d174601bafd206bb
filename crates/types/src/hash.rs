//! Transaction hash type using Blake3.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte transaction hash using Blake3.
///
/// Simulated transactions have no real payload, so hashes are derived from
/// random entropy mixed with the transaction's sequence number. All hashing
/// operations are deterministic.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash([u8; 32]);

impl TxHash {
    /// Size of hash in bytes.
    pub const BYTES: usize = 32;

    /// Create hash from bytes using Blake3.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let hash = blake3::hash(bytes);
        Self(*hash.as_bytes())
    }

    /// Create hash from multiple byte slices.
    pub fn from_parts(parts: &[&[u8]]) -> Self {
        let mut hasher = blake3::Hasher::new();
        for part in parts {
            hasher.update(part);
        }
        Self(*hasher.finalize().as_bytes())
    }

    /// Fabricate a hash for a simulated transaction.
    pub fn fabricate(sequence_number: u64, rng: &mut impl Rng) -> Self {
        let entropy: [u8; 32] = rng.gen();
        Self::from_parts(&[&entropy, &sequence_number.to_le_bytes()])
    }

    /// Convert hash to hex string (no prefix).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get bytes as slice reference.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "TxHash({}..{})", &hex[..8], &hex[56..])
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}
