//! Vulnerability ledger — per-vendor store of disclosure cases
//!
//! The ledger owns the vulnerability records of one vendor. Records are
//! created once and never deleted. Mutation happens through the direct
//! setters below, driven by the vendor instance on behalf of the
//! authority; identity checks live at that boundary.

use disclosure_types::hashlock::Hashlock;
use disclosure_types::ids::{ActorId, ProductId, VulnerabilityId};
use disclosure_types::reward::{Reward, RewardState};
use disclosure_types::vulnerability::{Vulnerability, VulnerabilityStatus};
use std::collections::HashMap;

use crate::errors::LedgerError;

/// Store of the vulnerability records of a single vendor.
#[derive(Debug, Default)]
pub struct VulnerabilityLedger {
    records: HashMap<VulnerabilityId, Vulnerability>,
}

impl VulnerabilityLedger {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Record a new case with status Pending and an empty reward.
    pub fn new_vulnerability(
        &mut self,
        vulnerability_id: VulnerabilityId,
        expert: ActorId,
        product_id: ProductId,
        hashlock: Hashlock,
        current_time: i64,
    ) -> Result<(), LedgerError> {
        if self.records.contains_key(&vulnerability_id) {
            return Err(LedgerError::AlreadyExists { vulnerability_id });
        }
        self.records.insert(
            vulnerability_id,
            Vulnerability::new(expert, product_id, hashlock, current_time),
        );
        Ok(())
    }

    pub fn set_state(
        &mut self,
        vulnerability_id: VulnerabilityId,
        status: VulnerabilityStatus,
    ) -> Result<(), LedgerError> {
        self.get_mut(vulnerability_id)?.status = status;
        Ok(())
    }

    pub fn set_reward_state(
        &mut self,
        vulnerability_id: VulnerabilityId,
        state: RewardState,
    ) -> Result<(), LedgerError> {
        self.get_mut(vulnerability_id)?.reward.state = state;
        Ok(())
    }

    /// Set both deadlines; also used as a controlled override to force
    /// expiry in tests and manual interventions.
    pub fn set_timelocks(
        &mut self,
        vulnerability_id: VulnerabilityId,
        ack_timelock: i64,
        timelock: i64,
    ) -> Result<(), LedgerError> {
        let record = self.get_mut(vulnerability_id)?;
        record.ack_timelock = ack_timelock;
        record.timelock = timelock;
        Ok(())
    }

    /// Store the revealed pre-image. The secret is set at most once and
    /// only if it matches the hashlock.
    pub fn set_secret(
        &mut self,
        vulnerability_id: VulnerabilityId,
        secret: &[u8],
    ) -> Result<(), LedgerError> {
        let record = self.get_mut(vulnerability_id)?;
        if record.secret.is_some() {
            return Err(LedgerError::SecretAlreadySet);
        }
        if !record.hashlock.matches(secret) {
            return Err(LedgerError::SecretMismatch);
        }
        record.secret = Some(secret.to_vec());
        Ok(())
    }

    pub fn set_location(
        &mut self,
        vulnerability_id: VulnerabilityId,
        location: &str,
    ) -> Result<(), LedgerError> {
        self.get_mut(vulnerability_id)?.location = location.to_string();
        Ok(())
    }

    /// Get a record by id.
    pub fn get(&self, vulnerability_id: &VulnerabilityId) -> Option<&Vulnerability> {
        self.records.get(vulnerability_id)
    }

    /// Cloned point-in-time view of a record.
    pub fn snapshot(&self, vulnerability_id: &VulnerabilityId) -> Option<Vulnerability> {
        self.records.get(vulnerability_id).cloned()
    }

    /// Reward sub-record of a case.
    pub fn reward(&self, vulnerability_id: &VulnerabilityId) -> Option<&Reward> {
        self.records.get(vulnerability_id).map(|r| &r.reward)
    }

    pub fn contains(&self, vulnerability_id: &VulnerabilityId) -> bool {
        self.records.contains_key(vulnerability_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn get_mut(
        &mut self,
        vulnerability_id: VulnerabilityId,
    ) -> Result<&mut Vulnerability, LedgerError> {
        self.records
            .get_mut(&vulnerability_id)
            .ok_or(LedgerError::NotFound { vulnerability_id })
    }
}
