use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Domain tag mixed into every record digest.
pub const RECORD_DOMAIN: &str = "herd-animal-v1";

/// BLAKE3 digest of a canonical record encoding.
///
/// Domain-separated so a record digest never collides with a hash of the
/// same bytes computed for another purpose.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordDigest([u8; 32]);

impl RecordDigest {
    /// Hash encoded record bytes.
    pub fn of(encoded: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(RECORD_DOMAIN.as_bytes());
        hasher.update(b":");
        hasher.update(encoded);
        Self(*hasher.finalize().as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for RecordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordDigest({})", self.short_hex())
    }
}

impl fmt::Display for RecordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
