//! Shared security primitives
//!
//! Provides the owner capability gating per-vendor instance creation and
//! the nonce tracker used for idempotent interledger confirmations.

use disclosure_types::ids::ActorId;
use std::collections::HashSet;

/// Owner capability of the disclosure authority.
///
/// Minted once at startup and handed to the vendor factory; only calls
/// carrying the matching authority identity may create per-vendor
/// instances. The token is deliberately not cloneable so a single
/// capability exists per deployment.
#[derive(Debug)]
pub struct AuthorityToken {
    authority: ActorId,
}

impl AuthorityToken {
    /// Issue the capability for `authority`.
    pub fn issue(authority: ActorId) -> Self {
        Self { authority }
    }

    pub fn authority(&self) -> &ActorId {
        &self.authority
    }

    /// Check whether `caller` holds this capability's identity.
    pub fn is_held_by(&self, caller: &ActorId) -> bool {
        *caller == self.authority
    }
}

/// Tracker of consumed interledger nonces.
///
/// Each disclosure delivery carries a unique nonce; a nonce can only be
/// consumed once, making the cross-system confirmation idempotent.
#[derive(Debug, Clone, Default)]
pub struct NonceTracker {
    used: HashSet<u64>,
}

impl NonceTracker {
    pub fn new() -> Self {
        Self {
            used: HashSet::new(),
        }
    }

    /// Check whether a nonce has been consumed.
    pub fn is_used(&self, nonce: u64) -> bool {
        self.used.contains(&nonce)
    }

    /// Consume a nonce. Returns `false` if already consumed (replay).
    pub fn use_nonce(&mut self, nonce: u64) -> bool {
        self.used.insert(nonce)
    }

    /// Number of consumed nonces.
    pub fn count(&self) -> usize {
        self.used.len()
    }
}
