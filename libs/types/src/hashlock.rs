//! Hashlock commitment type
//!
//! A hashlock is a SHA-256 commitment to a secret published at
//! submission time; the bounty is released by revealing a pre-image
//! that hashes to the commitment.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 commitment `hash(secret)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hashlock([u8; 32]);

impl Hashlock {
    /// Commit to a secret.
    pub fn commit(secret: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(secret);
        Self(hasher.finalize().into())
    }

    /// Check whether `secret` is the committed pre-image.
    pub fn matches(&self, secret: &[u8]) -> bool {
        Self::commit(secret) == *self
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Hashlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
