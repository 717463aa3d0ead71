//! Headless client for the Real Estate Tokenization protocol.
//!
//! The crate wires a wallet session, a per-chain contract resolver, a
//! role-gated view router, and role dashboard services over a bookkeeping
//! REST backend. Embedders supply a [`WalletProvider`] (or run browse-only
//! without one), load a [`config::Config`], and drive everything through
//! [`Context`].

pub mod access;
pub mod config;
pub mod logger;

mod backend;
mod chain;
mod context;
mod error;
mod observability;
mod services;
mod session_store;
mod types;
mod wallet;

pub use backend::{BackendApi, BackendError, Credentials, HttpBackend};
pub use chain::{
    BlockchainProvider, ChainError, ChainManager, ChainRegistry, ContractSet, Deployment,
    NativeCurrency, NetworkDescriptor,
    utils::{format_token_amount, parse_token_amount},
};
pub use context::Context;
pub use error::ClientError;
pub use services::{
    AdminService, InvestorService, OperationSummary, OperatorService, OwnerService, PositionDrift,
    ServiceError,
};
pub use session_store::{SessionStore, SessionStoreError};
pub use types::{
    ChainId, EstateRecord, FUJI, OperatorProfile, OwnerProfile, Position, Role, SEPOLIA,
    TokenListing, TxRecord,
};
pub use wallet::{
    ConnectionStatus, KeyedWallet, WalletError, WalletEvents, WalletNotification, WalletProvider,
    WalletSession,
};
// Primitives that cross the crate boundary
pub use alloy::primitives::{Address, U256};
