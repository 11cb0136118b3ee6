//! Vulnerability record and status machine
//!
//! A record is created once per disclosure case and never deleted; the
//! status moves monotonically along
//! `Pending → {Invalid, Duplicate, Valid} → Acknowledged → Disclosable → Disclosed`,
//! with the `Valid → Disclosable` shortcut when the vendor never
//! acknowledges and the acknowledgment deadline lapses.

use crate::hashlock::Hashlock;
use crate::ids::{ActorId, ProductId};
use crate::reward::Reward;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a vulnerability case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VulnerabilityStatus {
    /// Submitted, awaiting the approval decision
    Pending,
    /// Rejected as not a vulnerability
    Invalid,
    /// Approved, awaiting vendor acknowledgment
    Valid,
    /// Rejected as already reported
    Duplicate,
    /// Vendor acknowledged and escrowed a bounty
    Acknowledged,
    /// Secret revealed, ready for public disclosure
    Disclosable,
    /// Publicly disclosed with a location reference
    Disclosed,
}

impl VulnerabilityStatus {
    /// Terminal states admit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Invalid | Self::Duplicate | Self::Disclosed)
    }

    /// A vendor acknowledgment is only admissible from an approved case.
    pub fn can_acknowledge(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl fmt::Display for VulnerabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "Pending",
            Self::Invalid => "Invalid",
            Self::Valid => "Valid",
            Self::Duplicate => "Duplicate",
            Self::Acknowledged => "Acknowledged",
            Self::Disclosable => "Disclosable",
            Self::Disclosed => "Disclosed",
        };
        write!(f, "{}", label)
    }
}

/// A single vulnerability case owned by one vendor and one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    /// Researcher that submitted the case
    pub expert: ActorId,
    pub status: VulnerabilityStatus,
    /// Commitment to the disclosure secret
    pub hashlock: Hashlock,
    /// Revealed pre-image, set at most once
    pub secret: Option<Vec<u8>>,
    /// Deadline after which disclosure is permitted unconditionally (0 = unset)
    pub timelock: i64,
    /// Deadline for the vendor to acknowledge (0 = unset)
    pub ack_timelock: i64,
    /// Public disclosure reference, empty until Disclosed
    pub location: String,
    pub created_at: i64,
    pub product_id: ProductId,
    pub reward: Reward,
}

impl Vulnerability {
    pub fn new(
        expert: ActorId,
        product_id: ProductId,
        hashlock: Hashlock,
        created_at: i64,
    ) -> Self {
        Self {
            expert,
            status: VulnerabilityStatus::Pending,
            hashlock,
            secret: None,
            timelock: 0,
            ack_timelock: 0,
            location: String::new(),
            created_at,
            product_id,
            reward: Reward::new(),
        }
    }
}
