//! Content fingerprints for loaded manifests
//!
//! Each manifest is hashed when it is loaded; the store combines those
//! hashes so a reload can tell whether the workspace actually changed.

use blake3::Hasher;
use serde::{Serialize, Serializer};
use std::fmt;

/// A blake3 content hash
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub content_hash: blake3::Hash,
}

impl Fingerprint {
    /// Fingerprint raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Fingerprint {
            content_hash: blake3::hash(bytes),
        }
    }

    /// Fingerprint an ordered sequence of fingerprints
    pub fn combine<'a>(parts: impl IntoIterator<Item = &'a Fingerprint>) -> Self {
        let mut hasher = Hasher::new();
        for part in parts {
            hasher.update(part.content_hash.as_bytes());
        }
        Fingerprint {
            content_hash: hasher.finalize(),
        }
    }

    /// Fingerprint of an empty workspace
    pub fn empty() -> Self {
        Self::combine(std::iter::empty())
    }

    /// Get the hash as a hex string
    pub fn to_hex(&self) -> String {
        self.content_hash.to_hex().to_string()
    }

    /// First twelve hex digits, for log lines
    pub fn short(&self) -> String {
        self.content_hash.to_hex().as_str()[..12].to_string()
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.short())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}
