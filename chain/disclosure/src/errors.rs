//! Protocol error types
//!
//! Comprehensive error taxonomy for the catalog, ledger, escrow, vendor
//! instance, registry and coordinator operations. Every failing call is
//! all-or-nothing: validation happens before any mutation, so an `Err`
//! always means the prior state is intact.

use disclosure_types::ids::{ActorId, ProductId, VulnerabilityId};
use disclosure_types::vulnerability::VulnerabilityStatus;
use thiserror::Error;

/// Product catalog errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Product already registered: {product_id}")]
    AlreadyRegistered { product_id: ProductId },

    #[error("Product not registered: {product_id}")]
    NotRegistered { product_id: ProductId },
}

/// Vulnerability ledger errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Vulnerability already recorded: {vulnerability_id}")]
    AlreadyExists { vulnerability_id: VulnerabilityId },

    #[error("Vulnerability not found: {vulnerability_id}")]
    NotFound { vulnerability_id: VulnerabilityId },

    #[error("Product not registered: {product_id}")]
    ProductNotRegistered { product_id: ProductId },

    #[error("Secret already set")]
    SecretAlreadySet,

    #[error("Hashed secret and hashlock do not match")]
    SecretMismatch,
}

/// Escrow account errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EscrowError {
    #[error("Insufficient free balance: requested {requested}, available {available}")]
    InsufficientFunds { requested: String, available: String },

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,
}

/// Per-vendor instance errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VendorError {
    #[error("Unauthorized: caller does not hold the required identity")]
    Unauthorized,

    #[error("The acknowledgment deadline has expired: {deadline}")]
    AckExpired { deadline: i64 },

    #[error("Operation not permitted from status {status}")]
    InvalidState { status: VulnerabilityStatus },

    #[error("No bounty is set for this vulnerability")]
    RewardNotSet,

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Escrow error: {0}")]
    Escrow(#[from] EscrowError),
}

/// Vendor registry errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Vendor already registered: {vendor}")]
    AlreadyRegistered { vendor: ActorId },

    #[error("Vendor already unregistered: {vendor}")]
    AlreadyUnregistered { vendor: ActorId },

    #[error("Vendor not found: {vendor}")]
    NotFound { vendor: ActorId },

    #[error("Unauthorized: caller is not the authority")]
    Unauthorized,
}

/// Coordinator errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthorityError {
    #[error("Unauthorized: caller is not permitted to perform this operation")]
    Unauthorized,

    #[error("Operation not permitted from status {status}")]
    InvalidState { status: VulnerabilityStatus },

    #[error("Hashed secret and hashlock do not match")]
    SecretMismatch,

    #[error("Nonce already consumed: {nonce}")]
    NonceReused { nonce: u64 },

    #[error("Vulnerability not found: {vulnerability_id}")]
    VulnerabilityNotFound { vulnerability_id: VulnerabilityId },

    #[error("Vendor is not registered: {vendor}")]
    VendorNotRegistered { vendor: ActorId },

    #[error("Unknown decision code: {code}")]
    DecisionCodeUnknown { code: u8 },

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Vendor error: {0}")]
    Vendor(#[from] VendorError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
