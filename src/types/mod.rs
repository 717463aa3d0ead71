//! Domain types used across the codebase.
//!
//! This module contains core data structures that are shared between the
//! wallet session, chain resolver, backend client, and role services.

mod chain;
mod records;
mod role;

pub use chain::{ChainId, FUJI, SEPOLIA};
pub use records::{
    EstateRecord, OperatorProfile, OwnerProfile, Position, TokenListing, TxRecord,
};
pub use role::Role;
