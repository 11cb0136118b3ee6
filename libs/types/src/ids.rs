//! Identifier types for disclosure ledger entities
//!
//! Actors (authority, vendors, experts, the interledger relay) carry
//! address-like string identities. Products and vulnerabilities use
//! 32-byte hash identifiers: product ids are derived from the owning
//! vendor and the product name, vulnerability ids are the content hash
//! of the vulnerability description, so the same report always maps to
//! the same id.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

/// Error raised when constructing a 32-byte identifier from a slice.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IdError {
    #[error("Invalid identifier length: expected 32 bytes, got {len}")]
    InvalidLength { len: usize },
}

/// Address-like identity of an external party.
///
/// The same type identifies the authority, vendors, experts and the
/// interledger relay; authorization checks compare caller identities
/// against the stored ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ActorId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Unique identifier of a product within a vendor catalog.
///
/// Derived deterministically from (vendor, product name), so registering
/// the same name twice yields the same id and is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId([u8; 32]);

impl ProductId {
    /// Derive the id for a product offered by `vendor`.
    pub fn derive(vendor: &ActorId, name: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(vendor.as_str().as_bytes());
        hasher.update([0u8]); // domain separator between vendor and name
        hasher.update(name.as_bytes());
        Self(hasher.finalize().into())
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl TryFrom<&[u8]> for ProductId {
    type Error = IdError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; 32] = slice
            .try_into()
            .map_err(|_| IdError::InvalidLength { len: slice.len() })?;
        Ok(Self(bytes))
    }
}

/// Unique identifier of a vulnerability case.
///
/// The id is the SHA-256 hash of the vulnerability description, not a
/// sequence number: resubmitting the same report produces the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VulnerabilityId([u8; 32]);

impl VulnerabilityId {
    /// Compute the content-hash id of a vulnerability description.
    pub fn from_content(description: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(description);
        Self(hasher.finalize().into())
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for VulnerabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl TryFrom<&[u8]> for VulnerabilityId {
    type Error = IdError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; 32] = slice
            .try_into()
            .map_err(|_| IdError::InvalidLength { len: slice.len() })?;
        Ok(Self(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_id_display() {
        let id = ActorId::new("vendor-1");
        assert_eq!(id.to_string(), "vendor-1");
        assert_eq!(id.as_str(), "vendor-1");
    }

    #[test]
    fn test_product_id_deterministic() {
        let vendor = ActorId::new("vendor-1");
        let a = ProductId::derive(&vendor, "Router OS");
        let b = ProductId::derive(&vendor, "Router OS");
        assert_eq!(a, b, "Same vendor and name must derive the same id");
    }

    #[test]
    fn test_product_id_differs_per_vendor() {
        let a = ProductId::derive(&ActorId::new("vendor-1"), "Router OS");
        let b = ProductId::derive(&ActorId::new("vendor-2"), "Router OS");
        assert_ne!(a, b);
    }

    #[test]
    fn test_product_id_differs_per_name() {
        let vendor = ActorId::new("vendor-1");
        let a = ProductId::derive(&vendor, "Router OS");
        let b = ProductId::derive(&vendor, "Router OS v2");
        assert_ne!(a, b);
    }

    #[test]
    fn test_vulnerability_id_content_hash() {
        let a = VulnerabilityId::from_content(b"stack overflow in parser");
        let b = VulnerabilityId::from_content(b"stack overflow in parser");
        let c = VulnerabilityId::from_content(b"heap overflow in parser");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_vulnerability_id_hex_display() {
        let id = VulnerabilityId::from_bytes([0xab; 32]);
        assert_eq!(id.to_string().len(), 64);
        assert!(id.to_string().starts_with("abab"));
    }

    #[test]
    fn test_id_try_from_slice() {
        let bytes = [7u8; 32];
        let id = VulnerabilityId::try_from(&bytes[..]).unwrap();
        assert_eq!(id.as_bytes(), &bytes);

        let short = [7u8; 16];
        let err = VulnerabilityId::try_from(&short[..]).unwrap_err();
        assert_eq!(err, IdError::InvalidLength { len: 16 });
    }

    #[test]
    fn test_id_serialization_round_trip() {
        let id = VulnerabilityId::from_content(b"report");
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: VulnerabilityId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
