//! Disclosure coordinator — the authority orchestrating the protocol
//!
//! Owns the vendor registry and drives the vulnerability state machine
//! end to end: expert submission, interledger approval, vendor
//! acknowledgment (through the vendor instance), hashlock release and
//! final disclosure. Timelocks are plain guard conditions evaluated
//! against the caller-supplied wall-clock reading; nothing is polled in
//! the background.

use disclosure_types::hashlock::Hashlock;
use disclosure_types::ids::{ActorId, ProductId, VulnerabilityId};
use disclosure_types::vulnerability::{Vulnerability, VulnerabilityStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::errors::{AuthorityError, LedgerError};
use crate::events::{
    DisclosureAccepted, DisclosureEvent, SecretPublished, SecretRelayRequested, VendorRegistered,
    VendorUnregistered, VulnerabilityApproval, VulnerabilityDisclosed, VulnerabilitySubmitted,
};
use crate::interledger::{Decision, DecisionMessage, DisclosureMessage, SecretRelay};
use crate::registry::{VendorFactory, VendorRecord, VendorRegistry};
use crate::security::{AuthorityToken, NonceTracker};
use crate::vendor::VendorInstance;

/// Protocol deadlines applied on approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclosureWindows {
    /// Window for the vendor to acknowledge an approved case
    pub ack_window_secs: i64,
    /// Grace period before disclosure becomes unconditionally permitted
    pub timelock_secs: i64,
}

impl Default for DisclosureWindows {
    /// One week to acknowledge, four weeks of disclosure grace.
    fn default() -> Self {
        Self {
            ack_window_secs: 604_800,
            timelock_secs: 2_419_200,
        }
    }
}

/// The authority coordinating experts, vendors and the interledger relay.
pub struct DisclosureCoordinator {
    authority: ActorId,
    interledger: ActorId,
    registry: VendorRegistry,
    /// Vulnerability id to owning vendor
    vulnerability_index: HashMap<VulnerabilityId, ActorId>,
    nonces: NonceTracker,
    windows: DisclosureWindows,
    events: Vec<DisclosureEvent>,
}

impl DisclosureCoordinator {
    /// Create the coordinator, minting the authority capability and the
    /// vendor factory in one step. Composition is static: once built,
    /// only this coordinator can create per-vendor instances.
    pub fn new(authority: ActorId, interledger: ActorId, windows: DisclosureWindows) -> Self {
        let token = AuthorityToken::issue(authority.clone());
        let registry = VendorRegistry::new(VendorFactory::new(token));
        Self {
            authority,
            interledger,
            registry,
            vulnerability_index: HashMap::new(),
            nonces: NonceTracker::new(),
            windows,
            events: Vec::new(),
        }
    }

    /// Create with the default one-week/four-week windows.
    pub fn with_default_windows(authority: ActorId, interledger: ActorId) -> Self {
        Self::new(authority, interledger, DisclosureWindows::default())
    }

    pub fn authority(&self) -> &ActorId {
        &self.authority
    }

    pub fn interledger(&self) -> &ActorId {
        &self.interledger
    }

    pub fn windows(&self) -> DisclosureWindows {
        self.windows
    }

    // ───────────────────────── Vendor lifecycle ─────────────────────────

    /// Register a vendor and mint its instance. Authority-only.
    pub fn register_vendor(
        &mut self,
        caller: &ActorId,
        vendor: ActorId,
        current_time: i64,
    ) -> Result<VendorRegistered, AuthorityError> {
        self.registry
            .register_vendor(caller, vendor.clone(), current_time)?;

        let event = VendorRegistered {
            vendor,
            registered_since: current_time,
        };
        self.events
            .push(DisclosureEvent::VendorRegistered(event.clone()));
        info!(vendor = %event.vendor, "vendor registered");
        Ok(event)
    }

    /// Unregister a vendor; its records stay queryable. Authority-only.
    pub fn unregister_vendor(
        &mut self,
        caller: &ActorId,
        vendor: &ActorId,
        current_time: i64,
    ) -> Result<VendorUnregistered, AuthorityError> {
        self.registry
            .unregister_vendor(caller, vendor, current_time)?;

        let event = VendorUnregistered {
            vendor: vendor.clone(),
            unregistered_since: current_time,
        };
        self.events
            .push(DisclosureEvent::VendorUnregistered(event.clone()));
        info!(vendor = %event.vendor, "vendor unregistered");
        Ok(event)
    }

    /// Access a vendor instance for read-only queries.
    pub fn vendor_instance(&self, vendor: &ActorId) -> Option<&VendorInstance> {
        self.registry.instance(vendor)
    }

    /// Access a vendor instance for vendor-side operations (funding,
    /// products, acknowledgment, withdrawal). The instance enforces the
    /// caller identity on every call.
    pub fn vendor_instance_mut(&mut self, vendor: &ActorId) -> Option<&mut VendorInstance> {
        self.registry.instance_mut(vendor)
    }

    pub fn vendor_record(&self, vendor: &ActorId) -> Option<&VendorRecord> {
        self.registry.record(vendor)
    }

    // ──────────────────────── Vulnerability intake ────────────────────────

    /// Submit a vulnerability case against a vendor product.
    ///
    /// The caller becomes the expert of record. Returns the case id,
    /// which is the content hash supplied by the expert.
    pub fn register_vulnerability(
        &mut self,
        caller: &ActorId,
        vendor: &ActorId,
        hashlock: Hashlock,
        product_id: ProductId,
        vulnerability_hash: VulnerabilityId,
        current_time: i64,
    ) -> Result<VulnerabilityId, AuthorityError> {
        if !self.registry.is_registered(vendor) {
            return Err(AuthorityError::VendorNotRegistered {
                vendor: vendor.clone(),
            });
        }
        if self.vulnerability_index.contains_key(&vulnerability_hash) {
            return Err(AuthorityError::Ledger(LedgerError::AlreadyExists {
                vulnerability_id: vulnerability_hash,
            }));
        }

        let authority = self.authority.clone();
        let instance =
            self.registry
                .instance_mut(vendor)
                .ok_or(AuthorityError::VendorNotRegistered {
                    vendor: vendor.clone(),
                })?;
        instance.new_vulnerability(
            &authority,
            vulnerability_hash,
            caller.clone(),
            product_id,
            hashlock,
            current_time,
        )?;

        self.vulnerability_index
            .insert(vulnerability_hash, vendor.clone());

        let event = VulnerabilitySubmitted {
            vulnerability_id: vulnerability_hash,
            expert: caller.clone(),
            vendor: vendor.clone(),
            hashlock,
        };
        self.events
            .push(DisclosureEvent::VulnerabilitySubmitted(event));
        debug!(vulnerability_id = %vulnerability_hash, vendor = %vendor, "vulnerability submitted");
        Ok(vulnerability_hash)
    }

    // ───────────────────────── Approval decisions ─────────────────────────

    /// Consume an interledger approval decision. Interledger-only.
    ///
    /// Approval stamps both deadlines and moves the case to Valid;
    /// Invalid and Duplicate move it straight to the terminal status.
    pub fn interledger_decision(
        &mut self,
        caller: &ActorId,
        message: &DecisionMessage,
        current_time: i64,
    ) -> Result<VulnerabilityApproval, AuthorityError> {
        self.require_interledger(caller)?;
        let decision =
            Decision::from_code(message.code).ok_or(AuthorityError::DecisionCodeUnknown {
                code: message.code,
            })?;
        self.apply_decision(message.vulnerability_id, decision, current_time)
    }

    /// Manual authority override rejecting a pending case as Invalid or
    /// Duplicate, bypassing the interledger path. Authority-only.
    pub fn reject_vulnerability(
        &mut self,
        caller: &ActorId,
        vulnerability_id: VulnerabilityId,
        is_invalid: bool,
    ) -> Result<VulnerabilityApproval, AuthorityError> {
        self.require_authority(caller)?;
        let decision = if is_invalid {
            Decision::Invalid
        } else {
            Decision::Duplicate
        };
        self.apply_decision(vulnerability_id, decision, 0)
    }

    fn apply_decision(
        &mut self,
        vulnerability_id: VulnerabilityId,
        decision: Decision,
        current_time: i64,
    ) -> Result<VulnerabilityApproval, AuthorityError> {
        let authority = self.authority.clone();
        let windows = self.windows;
        let vendor = self.owning_vendor(&vulnerability_id)?;

        let instance =
            self.registry
                .instance_mut(&vendor)
                .ok_or(AuthorityError::VulnerabilityNotFound { vulnerability_id })?;
        let record = instance
            .vulnerability(&vulnerability_id)
            .ok_or(AuthorityError::VulnerabilityNotFound { vulnerability_id })?;
        if record.status != VulnerabilityStatus::Pending {
            return Err(AuthorityError::InvalidState {
                status: record.status,
            });
        }

        let (status, timelock, ack_timelock) = match decision {
            Decision::Approve => (
                VulnerabilityStatus::Valid,
                current_time + windows.timelock_secs,
                current_time + windows.ack_window_secs,
            ),
            Decision::Invalid => (VulnerabilityStatus::Invalid, 0, 0),
            Decision::Duplicate => (VulnerabilityStatus::Duplicate, 0, 0),
        };

        if decision == Decision::Approve {
            instance.set_timelocks(&authority, vulnerability_id, ack_timelock, timelock)?;
        }
        instance.set_state(&authority, vulnerability_id, status)?;

        let event = VulnerabilityApproval {
            vulnerability_id,
            status,
            timelock,
            ack_timelock,
        };
        self.events
            .push(DisclosureEvent::VulnerabilityApproval(event.clone()));
        info!(vulnerability_id = %vulnerability_id, status = %status, "decision recorded");
        Ok(event)
    }

    // ───────────────────────── Secret publication ─────────────────────────

    /// Reveal the hashlock pre-image, making the case disclosable and
    /// releasing the bounty.
    ///
    /// The owning vendor may publish from Acknowledged at any time. The
    /// expert may publish only once a deadline has lapsed: the
    /// acknowledgment deadline when the vendor stayed silent (status
    /// Valid), or the disclosure timelock after an acknowledgment. The
    /// vendor's silence never blocks eventual disclosure.
    pub fn publish_secret(
        &mut self,
        caller: &ActorId,
        vulnerability_id: VulnerabilityId,
        secret: &[u8],
        current_time: i64,
    ) -> Result<SecretPublished, AuthorityError> {
        let authority = self.authority.clone();
        let vendor = self.owning_vendor(&vulnerability_id)?;

        let instance =
            self.registry
                .instance_mut(&vendor)
                .ok_or(AuthorityError::VulnerabilityNotFound { vulnerability_id })?;
        let record = instance
            .vulnerability(&vulnerability_id)
            .ok_or(AuthorityError::VulnerabilityNotFound { vulnerability_id })?;

        let status = record.status;
        let hashlock = record.hashlock;
        let ack_timelock = record.ack_timelock;
        let timelock = record.timelock;
        let reward_set = record.reward.is_set();
        let is_vendor = *caller == vendor;
        let is_expert = *caller == record.expert;

        let timelock_expired = match status {
            VulnerabilityStatus::Acknowledged => {
                if is_vendor {
                    current_time > timelock
                } else if is_expert {
                    if current_time <= timelock {
                        return Err(AuthorityError::Unauthorized);
                    }
                    true
                } else {
                    return Err(AuthorityError::Unauthorized);
                }
            }
            VulnerabilityStatus::Valid => {
                // Never acknowledged: opens to both parties once the
                // acknowledgment deadline lapses
                if !is_vendor && !is_expert {
                    return Err(AuthorityError::Unauthorized);
                }
                if current_time <= ack_timelock {
                    if is_expert {
                        return Err(AuthorityError::Unauthorized);
                    }
                    return Err(AuthorityError::InvalidState { status });
                }
                true
            }
            _ => return Err(AuthorityError::InvalidState { status }),
        };

        if !hashlock.matches(secret) {
            return Err(AuthorityError::SecretMismatch);
        }

        // Checks done: store the secret, flip the status, settle the bounty.
        instance.set_secret(&authority, vulnerability_id, secret)?;
        instance.set_state(&authority, vulnerability_id, VulnerabilityStatus::Disclosable)?;
        if reward_set {
            instance.pay_bounty(&authority, vulnerability_id)?;
        }

        self.events
            .push(DisclosureEvent::SecretRelayRequested(SecretRelayRequested {
                vulnerability_id,
                relay: SecretRelay {
                    vulnerability_id,
                    secret: secret.to_vec(),
                },
            }));
        let event = SecretPublished {
            vulnerability_id,
            patched: is_vendor,
            timelock_expired,
        };
        self.events
            .push(DisclosureEvent::SecretPublished(event.clone()));
        info!(
            vulnerability_id = %vulnerability_id,
            patched = event.patched,
            timelock_expired = event.timelock_expired,
            "secret published"
        );
        Ok(event)
    }

    // ───────────────────────── Final disclosure ─────────────────────────

    /// Consume an interledger disclosure delivery. Interledger-only.
    ///
    /// The nonce makes the confirmation idempotent: a replay fails
    /// without touching state.
    pub fn interledger_disclosure(
        &mut self,
        caller: &ActorId,
        nonce: u64,
        message: &DisclosureMessage,
    ) -> Result<VulnerabilityDisclosed, AuthorityError> {
        self.require_interledger(caller)?;
        if self.nonces.is_used(nonce) {
            return Err(AuthorityError::NonceReused { nonce });
        }

        let authority = self.authority.clone();
        let vulnerability_id = message.vulnerability_id;
        let vendor = self.owning_vendor(&vulnerability_id)?;

        let instance =
            self.registry
                .instance_mut(&vendor)
                .ok_or(AuthorityError::VulnerabilityNotFound { vulnerability_id })?;
        let record = instance
            .vulnerability(&vulnerability_id)
            .ok_or(AuthorityError::VulnerabilityNotFound { vulnerability_id })?;
        if record.status != VulnerabilityStatus::Disclosable {
            return Err(AuthorityError::InvalidState {
                status: record.status,
            });
        }

        instance.set_location(&authority, vulnerability_id, &message.location)?;
        instance.set_state(&authority, vulnerability_id, VulnerabilityStatus::Disclosed)?;
        self.nonces.use_nonce(nonce);

        let event = VulnerabilityDisclosed {
            vulnerability_id,
            communicator: caller.clone(),
            location: message.location.clone(),
        };
        self.events
            .push(DisclosureEvent::VulnerabilityDisclosed(event.clone()));
        self.events
            .push(DisclosureEvent::DisclosureAccepted(DisclosureAccepted {
                nonce,
            }));
        info!(vulnerability_id = %vulnerability_id, location = %event.location, "vulnerability disclosed");
        Ok(event)
    }

    // ───────────────────────── Bounty management ─────────────────────────

    /// Release a promised bounty without payment. Authority-only; the
    /// motivation is recorded for audit and not validated.
    pub fn cancel_bounty(
        &mut self,
        caller: &ActorId,
        vulnerability_id: VulnerabilityId,
        motivation: &str,
    ) -> Result<(), AuthorityError> {
        let vendor = self.owning_vendor(&vulnerability_id)?;
        let instance =
            self.registry
                .instance_mut(&vendor)
                .ok_or(AuthorityError::VulnerabilityNotFound { vulnerability_id })?;
        instance.cancel_bounty(caller, vulnerability_id, motivation)?;
        info!(vulnerability_id = %vulnerability_id, "bounty canceled");
        Ok(())
    }

    // ───────────────────────── Read accessors ─────────────────────────

    /// Vendor owning a vulnerability case.
    pub fn vulnerability_vendor(&self, vulnerability_id: &VulnerabilityId) -> Option<&ActorId> {
        self.vulnerability_index.get(vulnerability_id)
    }

    /// Resolve a vulnerability record across all vendors.
    pub fn vulnerability(&self, vulnerability_id: &VulnerabilityId) -> Option<&Vulnerability> {
        let vendor = self.vulnerability_index.get(vulnerability_id)?;
        self.registry.instance(vendor)?.vulnerability(vulnerability_id)
    }

    pub fn events(&self) -> &[DisclosureEvent] {
        &self.events
    }

    /// Drain all coordinator events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<DisclosureEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Internal guards ─────────────────────────

    fn owning_vendor(
        &self,
        vulnerability_id: &VulnerabilityId,
    ) -> Result<ActorId, AuthorityError> {
        self.vulnerability_index
            .get(vulnerability_id)
            .cloned()
            .ok_or(AuthorityError::VulnerabilityNotFound {
                vulnerability_id: *vulnerability_id,
            })
    }

    fn require_interledger(&self, caller: &ActorId) -> Result<(), AuthorityError> {
        if *caller != self.interledger {
            return Err(AuthorityError::Unauthorized);
        }
        Ok(())
    }

    fn require_authority(&self, caller: &ActorId) -> Result<(), AuthorityError> {
        if *caller != self.authority {
            return Err(AuthorityError::Unauthorized);
        }
        Ok(())
    }
}
