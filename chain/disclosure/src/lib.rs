//! Coordinated Vulnerability Disclosure Protocol
//!
//! This crate implements the ledger core coordinating a security
//! researcher, a software vendor and a trusted authority through an
//! escrowed-bounty, hashlock/timelock disclosure workflow. An external
//! interledger relay delivers authenticated approval and disclosure
//! events and carries revealed secrets to the counterpart ledger.
//!
//! # Modules
//! - `errors`: Protocol error taxonomy
//! - `events`: Append-only audit events
//! - `interledger`: Inbound/outbound relay message types
//! - `security`: Authority capability and nonce tracking
//! - `catalog`: Per-vendor product catalog
//! - `ledger`: Per-vendor vulnerability records
//! - `escrow`: Per-vendor funds and bounty reservations
//! - `vendor`: The per-vendor instance combining the three above
//! - `registry`: Vendor records and the gated instance factory
//! - `authority`: The disclosure coordinator driving the state machine
//!
//! Every mutating call takes `&mut self`, mirroring the serial
//! transaction model of the hosting ledger: calls on one coordinator are
//! totally ordered and atomic (validation precedes mutation, so a failed
//! call changes nothing). Hosts sharing a coordinator across threads
//! wrap it in a mutex.

pub mod authority;
pub mod catalog;
pub mod errors;
pub mod escrow;
pub mod events;
pub mod interledger;
pub mod ledger;
pub mod registry;
pub mod security;
pub mod vendor;

pub use authority::{DisclosureCoordinator, DisclosureWindows};

/// Protocol version — frozen after release
pub const PROTOCOL_VERSION: &str = "1.0.0";
