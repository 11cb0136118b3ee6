//! Protocol events
//!
//! Events are immutable records appended by protocol operations. They are
//! the audit channel of the ledger: each component keeps an append-only
//! log that observers (and the interledger relay) drain.

use disclosure_types::hashlock::Hashlock;
use disclosure_types::ids::{ActorId, ProductId, VulnerabilityId};
use disclosure_types::vulnerability::VulnerabilityStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::interledger::SecretRelay;

/// A vendor joined the registry and received its per-vendor instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRegistered {
    pub vendor: ActorId,
    pub registered_since: i64,
}

/// A vendor left the registry; its records remain queryable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorUnregistered {
    pub vendor: ActorId,
    pub unregistered_since: i64,
}

/// A product was added to a vendor catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRegistered {
    pub product_id: ProductId,
    pub vendor: ActorId,
    pub name: String,
}

/// A product was soft-deleted from a vendor catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUnregistered {
    pub product_id: ProductId,
}

/// An expert submitted a vulnerability case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnerabilitySubmitted {
    pub vulnerability_id: VulnerabilityId,
    pub expert: ActorId,
    pub vendor: ActorId,
    pub hashlock: Hashlock,
}

/// The approval decision was recorded (Valid, Invalid or Duplicate).
///
/// Timelocks are zero unless the decision was an approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnerabilityApproval {
    pub vulnerability_id: VulnerabilityId,
    pub status: VulnerabilityStatus,
    pub timelock: i64,
    pub ack_timelock: i64,
}

/// The secret was revealed and the case became disclosable.
///
/// `patched` is true when the owning vendor revealed the secret;
/// `timelock_expired` is true when disclosure went through a lapsed
/// deadline rather than a timely acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretPublished {
    pub vulnerability_id: VulnerabilityId,
    pub patched: bool,
    pub timelock_expired: bool,
}

/// Outbound request for the interledger to relay the revealed secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRelayRequested {
    pub vulnerability_id: VulnerabilityId,
    pub relay: SecretRelay,
}

/// The case was publicly disclosed with a location reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnerabilityDisclosed {
    pub vulnerability_id: VulnerabilityId,
    pub communicator: ActorId,
    pub location: String,
}

/// Acceptance acknowledgment for an interledger disclosure delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclosureAccepted {
    pub nonce: u64,
}

/// A bounty was paid out to the expert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BountyPaid {
    pub vulnerability_id: VulnerabilityId,
    pub expert: ActorId,
    pub amount: Decimal,
}

/// A bounty reservation was released without payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BountyCanceled {
    pub vulnerability_id: VulnerabilityId,
    pub motivation: String,
}

/// Enum wrapper for all protocol events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisclosureEvent {
    VendorRegistered(VendorRegistered),
    VendorUnregistered(VendorUnregistered),
    ProductRegistered(ProductRegistered),
    ProductUnregistered(ProductUnregistered),
    VulnerabilitySubmitted(VulnerabilitySubmitted),
    VulnerabilityApproval(VulnerabilityApproval),
    SecretPublished(SecretPublished),
    SecretRelayRequested(SecretRelayRequested),
    VulnerabilityDisclosed(VulnerabilityDisclosed),
    DisclosureAccepted(DisclosureAccepted),
    BountyPaid(BountyPaid),
    BountyCanceled(BountyCanceled),
}
