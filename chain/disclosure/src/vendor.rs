//! Vendor instance — catalog, ledger and escrow of a single vendor
//!
//! The factory mints one instance per vendor; the binding is immutable.
//! The instance is the authorization boundary: product and funding
//! operations accept only the owning vendor, record mutation accepts
//! only the authority. Every operation validates before mutating, so a
//! failed call leaves the instance unchanged.

use disclosure_types::hashlock::Hashlock;
use disclosure_types::ids::{ActorId, ProductId, VulnerabilityId};
use disclosure_types::reward::RewardState;
use disclosure_types::vulnerability::{Vulnerability, VulnerabilityStatus};
use rust_decimal::Decimal;

use crate::catalog::{Product, ProductCatalog};
use crate::errors::{LedgerError, VendorError};
use crate::escrow::EscrowAccount;
use crate::events::{
    BountyCanceled, BountyPaid, DisclosureEvent, ProductRegistered, ProductUnregistered,
};
use crate::ledger::VulnerabilityLedger;

/// Per-vendor protocol instance.
#[derive(Debug)]
pub struct VendorInstance {
    vendor: ActorId,
    authority: ActorId,
    catalog: ProductCatalog,
    ledger: VulnerabilityLedger,
    escrow: EscrowAccount,
    events: Vec<DisclosureEvent>,
}

impl VendorInstance {
    pub fn new(vendor: ActorId, authority: ActorId) -> Self {
        let catalog = ProductCatalog::new(vendor.clone());
        Self {
            vendor,
            authority,
            catalog,
            ledger: VulnerabilityLedger::new(),
            escrow: EscrowAccount::new(),
            events: Vec::new(),
        }
    }

    pub fn vendor(&self) -> &ActorId {
        &self.vendor
    }

    // ───────────────────────── Vendor operations ─────────────────────────

    /// Credit inbound funding. Only the owning vendor may fund.
    pub fn fund(&mut self, caller: &ActorId, amount: Decimal) -> Result<(), VendorError> {
        self.require_vendor(caller)?;
        self.escrow.fund(amount)?;
        Ok(())
    }

    /// Register a product by name; returns the derived id.
    pub fn register_product(
        &mut self,
        caller: &ActorId,
        name: &str,
        current_time: i64,
    ) -> Result<ProductId, VendorError> {
        self.require_vendor(caller)?;
        let product_id = self.catalog.register(name, current_time)?;
        self.events
            .push(DisclosureEvent::ProductRegistered(ProductRegistered {
                product_id,
                vendor: self.vendor.clone(),
                name: name.to_string(),
            }));
        Ok(product_id)
    }

    /// Soft-delete a product.
    pub fn unregister_product(
        &mut self,
        caller: &ActorId,
        product_id: ProductId,
        current_time: i64,
    ) -> Result<(), VendorError> {
        self.require_vendor(caller)?;
        self.catalog.unregister(product_id, current_time)?;
        self.events
            .push(DisclosureEvent::ProductUnregistered(ProductUnregistered {
                product_id,
            }));
        Ok(())
    }

    /// Acknowledge an approved vulnerability and escrow a bounty.
    ///
    /// Requires status Valid, a live acknowledgment deadline and enough
    /// free balance to back the bounty.
    pub fn acknowledge(
        &mut self,
        caller: &ActorId,
        vulnerability_id: VulnerabilityId,
        bounty: Decimal,
        current_time: i64,
    ) -> Result<(), VendorError> {
        self.require_vendor(caller)?;

        let record = self
            .ledger
            .get(&vulnerability_id)
            .ok_or(LedgerError::NotFound { vulnerability_id })?;
        if !record.status.can_acknowledge() {
            return Err(VendorError::InvalidState {
                status: record.status,
            });
        }
        if current_time > record.ack_timelock {
            return Err(VendorError::AckExpired {
                deadline: record.ack_timelock,
            });
        }

        // Reserve first: it performs the funds check, and the ledger
        // mutations below cannot fail once it succeeds.
        self.escrow.reserve(bounty)?;

        let record = self.ledger.get_mut(vulnerability_id)?;
        record.reward.set(bounty);
        record.status = VulnerabilityStatus::Acknowledged;
        Ok(())
    }

    /// Withdraw free funds. Only the owning vendor.
    pub fn withdraw(&mut self, caller: &ActorId, amount: Decimal) -> Result<(), VendorError> {
        self.require_vendor(caller)?;
        self.escrow.withdraw(amount)?;
        Ok(())
    }

    // ──────────────────────── Authority operations ────────────────────────

    /// Record a new vulnerability case. Only the authority.
    pub fn new_vulnerability(
        &mut self,
        caller: &ActorId,
        vulnerability_id: VulnerabilityId,
        expert: ActorId,
        product_id: ProductId,
        hashlock: Hashlock,
        current_time: i64,
    ) -> Result<(), VendorError> {
        self.require_authority(caller)?;
        if !self.catalog.is_registered(&product_id) {
            return Err(VendorError::Ledger(LedgerError::ProductNotRegistered {
                product_id,
            }));
        }
        self.ledger
            .new_vulnerability(vulnerability_id, expert, product_id, hashlock, current_time)?;
        Ok(())
    }

    pub fn set_state(
        &mut self,
        caller: &ActorId,
        vulnerability_id: VulnerabilityId,
        status: VulnerabilityStatus,
    ) -> Result<(), VendorError> {
        self.require_authority(caller)?;
        self.ledger.set_state(vulnerability_id, status)?;
        Ok(())
    }

    pub fn set_reward_state(
        &mut self,
        caller: &ActorId,
        vulnerability_id: VulnerabilityId,
        state: RewardState,
    ) -> Result<(), VendorError> {
        self.require_authority(caller)?;
        self.ledger.set_reward_state(vulnerability_id, state)?;
        Ok(())
    }

    pub fn set_timelocks(
        &mut self,
        caller: &ActorId,
        vulnerability_id: VulnerabilityId,
        ack_timelock: i64,
        timelock: i64,
    ) -> Result<(), VendorError> {
        self.require_authority(caller)?;
        self.ledger
            .set_timelocks(vulnerability_id, ack_timelock, timelock)?;
        Ok(())
    }

    pub fn set_secret(
        &mut self,
        caller: &ActorId,
        vulnerability_id: VulnerabilityId,
        secret: &[u8],
    ) -> Result<(), VendorError> {
        self.require_authority(caller)?;
        self.ledger.set_secret(vulnerability_id, secret)?;
        Ok(())
    }

    pub fn set_location(
        &mut self,
        caller: &ActorId,
        vulnerability_id: VulnerabilityId,
        location: &str,
    ) -> Result<(), VendorError> {
        self.require_authority(caller)?;
        self.ledger.set_location(vulnerability_id, location)?;
        Ok(())
    }

    /// Pay the promised bounty to the expert. Only the authority.
    pub fn pay_bounty(
        &mut self,
        caller: &ActorId,
        vulnerability_id: VulnerabilityId,
    ) -> Result<(), VendorError> {
        self.require_authority(caller)?;

        let record = self
            .ledger
            .get(&vulnerability_id)
            .ok_or(LedgerError::NotFound { vulnerability_id })?;
        if record.reward.state != RewardState::Set {
            return Err(VendorError::RewardNotSet);
        }
        let amount = record.reward.amount;
        let expert = record.expert.clone();

        self.escrow.pay_out(amount)?;
        self.ledger.get_mut(vulnerability_id)?.reward.mark_sent();

        self.events.push(DisclosureEvent::BountyPaid(BountyPaid {
            vulnerability_id,
            expert,
            amount,
        }));
        Ok(())
    }

    /// Release the bounty reservation without payment. Only the authority.
    ///
    /// The motivation is an audit annotation and is not validated.
    pub fn cancel_bounty(
        &mut self,
        caller: &ActorId,
        vulnerability_id: VulnerabilityId,
        motivation: &str,
    ) -> Result<(), VendorError> {
        self.require_authority(caller)?;

        let record = self
            .ledger
            .get(&vulnerability_id)
            .ok_or(LedgerError::NotFound { vulnerability_id })?;
        if record.reward.state != RewardState::Set {
            return Err(VendorError::RewardNotSet);
        }
        let amount = record.reward.amount;

        self.escrow.release(amount)?;
        self.ledger.get_mut(vulnerability_id)?.reward.cancel();

        self.events
            .push(DisclosureEvent::BountyCanceled(BountyCanceled {
                vulnerability_id,
                motivation: motivation.to_string(),
            }));
        Ok(())
    }

    // ───────────────────────── Read accessors ─────────────────────────

    pub fn balance_total(&self) -> Decimal {
        self.escrow.total()
    }

    pub fn balance_free(&self) -> Decimal {
        self.escrow.free()
    }

    pub fn vulnerability(&self, vulnerability_id: &VulnerabilityId) -> Option<&Vulnerability> {
        self.ledger.get(vulnerability_id)
    }

    /// Cloned point-in-time view of a record.
    pub fn vulnerability_snapshot(
        &self,
        vulnerability_id: &VulnerabilityId,
    ) -> Option<Vulnerability> {
        self.ledger.snapshot(vulnerability_id)
    }

    pub fn product(&self, product_id: &ProductId) -> Option<&Product> {
        self.catalog.get(product_id)
    }

    pub fn events(&self) -> &[DisclosureEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<DisclosureEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Internal guards ─────────────────────────

    fn require_vendor(&self, caller: &ActorId) -> Result<(), VendorError> {
        if *caller != self.vendor {
            return Err(VendorError::Unauthorized);
        }
        Ok(())
    }

    fn require_authority(&self, caller: &ActorId) -> Result<(), VendorError> {
        if *caller != self.authority {
            return Err(VendorError::Unauthorized);
        }
        Ok(())
    }
}
