//! Vendor registry — vendor records and instance factory
//!
//! Maps each vendor identity to its registration record and its
//! per-vendor instance. Instances are minted exclusively by the factory,
//! which holds the authority capability issued at startup; no other
//! caller can create one. Vendor records are soft-deleted: unregistering
//! flips the flag, the record and instance survive, and a later
//! re-registration re-activates the same instance.

use disclosure_types::ids::ActorId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::RegistryError;
use crate::security::AuthorityToken;
use crate::vendor::VendorInstance;

/// Registration record of a vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRecord {
    pub registered: bool,
    pub registered_since: i64,
    pub unregistered_since: i64,
}

/// Factory minting per-vendor instances, gated by the authority capability.
#[derive(Debug)]
pub struct VendorFactory {
    token: AuthorityToken,
}

impl VendorFactory {
    pub fn new(token: AuthorityToken) -> Self {
        Self { token }
    }

    /// Verify that `caller` holds the authority capability.
    pub fn authorize(&self, caller: &ActorId) -> Result<(), RegistryError> {
        if !self.token.is_held_by(caller) {
            return Err(RegistryError::Unauthorized);
        }
        Ok(())
    }

    /// Mint the instance bound to `vendor`. Authority-only.
    pub fn create_instance(
        &self,
        caller: &ActorId,
        vendor: ActorId,
    ) -> Result<VendorInstance, RegistryError> {
        self.authorize(caller)?;
        Ok(VendorInstance::new(vendor, self.token.authority().clone()))
    }
}

struct VendorEntry {
    record: VendorRecord,
    instance: VendorInstance,
}

/// Registry of all vendors known to the authority.
pub struct VendorRegistry {
    factory: VendorFactory,
    vendors: HashMap<ActorId, VendorEntry>,
}

impl VendorRegistry {
    pub fn new(factory: VendorFactory) -> Self {
        Self {
            factory,
            vendors: HashMap::new(),
        }
    }

    /// Register a vendor, minting its instance on first registration.
    ///
    /// A vendor that unregistered earlier re-activates and keeps its
    /// instance; a vendor that is currently registered is rejected.
    pub fn register_vendor(
        &mut self,
        caller: &ActorId,
        vendor: ActorId,
        current_time: i64,
    ) -> Result<(), RegistryError> {
        self.factory.authorize(caller)?;

        if let Some(entry) = self.vendors.get_mut(&vendor) {
            if entry.record.registered {
                return Err(RegistryError::AlreadyRegistered { vendor });
            }
            entry.record.registered = true;
            entry.record.registered_since = current_time;
            entry.record.unregistered_since = 0;
            return Ok(());
        }

        let instance = self.factory.create_instance(caller, vendor.clone())?;
        self.vendors.insert(
            vendor,
            VendorEntry {
                record: VendorRecord {
                    registered: true,
                    registered_since: current_time,
                    unregistered_since: 0,
                },
                instance,
            },
        );
        Ok(())
    }

    /// Soft-delete a vendor registration.
    pub fn unregister_vendor(
        &mut self,
        caller: &ActorId,
        vendor: &ActorId,
        current_time: i64,
    ) -> Result<(), RegistryError> {
        self.factory.authorize(caller)?;

        let entry = self
            .vendors
            .get_mut(vendor)
            .ok_or_else(|| RegistryError::NotFound {
                vendor: vendor.clone(),
            })?;
        if !entry.record.registered {
            return Err(RegistryError::AlreadyUnregistered {
                vendor: vendor.clone(),
            });
        }
        entry.record.registered = false;
        entry.record.unregistered_since = current_time;
        Ok(())
    }

    pub fn record(&self, vendor: &ActorId) -> Option<&VendorRecord> {
        self.vendors.get(vendor).map(|e| &e.record)
    }

    pub fn instance(&self, vendor: &ActorId) -> Option<&VendorInstance> {
        self.vendors.get(vendor).map(|e| &e.instance)
    }

    pub fn instance_mut(&mut self, vendor: &ActorId) -> Option<&mut VendorInstance> {
        self.vendors.get_mut(vendor).map(|e| &mut e.instance)
    }

    pub fn is_registered(&self, vendor: &ActorId) -> bool {
        self.vendors
            .get(vendor)
            .map_or(false, |e| e.record.registered)
    }

    /// Number of vendors ever registered.
    pub fn len(&self) -> usize {
        self.vendors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authority() -> ActorId {
        ActorId::new("authority")
    }

    fn vendor() -> ActorId {
        ActorId::new("vendor-1")
    }

    fn registry() -> VendorRegistry {
        let token = AuthorityToken::issue(authority());
        VendorRegistry::new(VendorFactory::new(token))
    }

    #[test]
    fn test_register_vendor() {
        let mut registry = registry();
        registry
            .register_vendor(&authority(), vendor(), 1000)
            .unwrap();

        let record = registry.record(&vendor()).unwrap();
        assert!(record.registered);
        assert_eq!(record.registered_since, 1000);
        assert_eq!(record.unregistered_since, 0);
        assert!(registry.is_registered(&vendor()));
        assert!(registry.instance(&vendor()).is_some());
    }

    #[test]
    fn test_register_vendor_twice_rejected() {
        let mut registry = registry();
        registry
            .register_vendor(&authority(), vendor(), 1000)
            .unwrap();
        let result = registry.register_vendor(&authority(), vendor(), 2000);
        assert_eq!(
            result,
            Err(RegistryError::AlreadyRegistered { vendor: vendor() })
        );
    }

    #[test]
    fn test_register_vendor_unauthorized() {
        let mut registry = registry();
        let result = registry.register_vendor(&ActorId::new("eve"), vendor(), 1000);
        assert_eq!(result, Err(RegistryError::Unauthorized));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unregister_vendor() {
        let mut registry = registry();
        registry
            .register_vendor(&authority(), vendor(), 1000)
            .unwrap();
        registry
            .unregister_vendor(&authority(), &vendor(), 2000)
            .unwrap();

        let record = registry.record(&vendor()).unwrap();
        assert!(!record.registered);
        assert_eq!(record.unregistered_since, 2000);
        assert!(!registry.is_registered(&vendor()));
    }

    #[test]
    fn test_unregister_vendor_twice_rejected() {
        let mut registry = registry();
        registry
            .register_vendor(&authority(), vendor(), 1000)
            .unwrap();
        registry
            .unregister_vendor(&authority(), &vendor(), 2000)
            .unwrap();

        let result = registry.unregister_vendor(&authority(), &vendor(), 3000);
        assert_eq!(
            result,
            Err(RegistryError::AlreadyUnregistered { vendor: vendor() })
        );
    }

    #[test]
    fn test_unregister_unknown_vendor() {
        let mut registry = registry();
        let result = registry.unregister_vendor(&authority(), &vendor(), 1000);
        assert_eq!(result, Err(RegistryError::NotFound { vendor: vendor() }));
    }

    #[test]
    fn test_reregistration_keeps_instance() {
        let mut registry = registry();
        registry
            .register_vendor(&authority(), vendor(), 1000)
            .unwrap();

        // Leave some state on the instance
        registry
            .instance_mut(&vendor())
            .unwrap()
            .register_product(&vendor(), "Router OS", 1100)
            .unwrap();

        registry
            .unregister_vendor(&authority(), &vendor(), 2000)
            .unwrap();
        registry
            .register_vendor(&authority(), vendor(), 3000)
            .unwrap();

        let record = registry.record(&vendor()).unwrap();
        assert!(record.registered);
        assert_eq!(record.registered_since, 3000);
        assert_eq!(record.unregistered_since, 0);
        // The instance and its catalog survived the cycle
        assert_eq!(registry.instance(&vendor()).unwrap().events().len(), 1);
    }

    #[test]
    fn test_factory_create_unauthorized() {
        let token = AuthorityToken::issue(authority());
        let factory = VendorFactory::new(token);
        let result = factory.create_instance(&ActorId::new("eve"), vendor());
        assert!(result.is_err());
    }
}
