//! Product catalog — per-vendor product registration
//!
//! Products are created once and soft-deleted: unregistering flips the
//! flag and stamps the time, the record stays queryable. Ids derive from
//! (vendor, name), so a name can never be registered twice — not even
//! after the first registration was revoked.

use disclosure_types::ids::{ActorId, ProductId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::CatalogError;

/// A product offered by a vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub registered: bool,
    pub registered_since: i64,
    pub unregistered_since: i64,
}

/// Catalog of the products of a single vendor.
#[derive(Debug)]
pub struct ProductCatalog {
    vendor: ActorId,
    products: HashMap<ProductId, Product>,
}

impl ProductCatalog {
    pub fn new(vendor: ActorId) -> Self {
        Self {
            vendor,
            products: HashMap::new(),
        }
    }

    /// Register a product by name; returns the derived id.
    ///
    /// Re-registration under the same derived id is rejected even after
    /// unregistration, preventing identity reuse.
    pub fn register(&mut self, name: &str, current_time: i64) -> Result<ProductId, CatalogError> {
        let product_id = ProductId::derive(&self.vendor, name);
        if self.products.contains_key(&product_id) {
            return Err(CatalogError::AlreadyRegistered { product_id });
        }

        self.products.insert(
            product_id,
            Product {
                id: product_id,
                name: name.to_string(),
                registered: true,
                registered_since: current_time,
                unregistered_since: 0,
            },
        );
        Ok(product_id)
    }

    /// Soft-delete a product.
    pub fn unregister(
        &mut self,
        product_id: ProductId,
        current_time: i64,
    ) -> Result<(), CatalogError> {
        let product = self
            .products
            .get_mut(&product_id)
            .ok_or(CatalogError::NotRegistered { product_id })?;

        if !product.registered {
            return Err(CatalogError::NotRegistered { product_id });
        }

        product.registered = false;
        product.unregistered_since = current_time;
        Ok(())
    }

    /// Check whether a product id is currently registered.
    pub fn is_registered(&self, product_id: &ProductId) -> bool {
        self.products
            .get(product_id)
            .map_or(false, |p| p.registered)
    }

    /// Get a product record, registered or not.
    pub fn get(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.get(product_id)
    }

    /// Number of products ever registered.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
