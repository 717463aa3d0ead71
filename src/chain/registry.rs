use std::collections::BTreeMap;

use alloy::primitives::Address;

use super::error::ChainError;
use crate::types::{ChainId, FUJI, SEPOLIA};

/// Declarative per-chain record, shaped after `wallet_addEthereumChain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkDescriptor {
    pub chain_id: ChainId,
    pub chain_name: &'static str,
    pub rpc_url: &'static str,
    pub explorer_url: &'static str,
    pub currency: NativeCurrency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeCurrency {
    pub symbol: &'static str,
    pub decimals: u8,
}

/// Resolved contract addresses for one chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    pub estate_registry: Address,
    pub verification: Address,
    pub tokenization_manager: Address,
    pub payment_token: Address,
}

/// One row of the static deployment table, addresses still unparsed.
struct ChainEntry {
    descriptor: NetworkDescriptor,
    estate_registry: &'static str,
    verification: &'static str,
    tokenization_manager: &'static str,
    payment_token: &'static str,
}

const SUPPORTED: &[ChainEntry] = &[
    ChainEntry {
        descriptor: NetworkDescriptor {
            chain_id: FUJI,
            chain_name: "Avalanche Fuji Testnet",
            rpc_url: "https://api.avax-test.network/ext/bc/C/rpc",
            explorer_url: "https://testnet.snowtrace.io",
            currency: NativeCurrency {
                symbol: "AVAX",
                decimals: 18,
            },
        },
        estate_registry: "0x6f4e3a68bca483d90e93b85d86a955cbaeda2b49",
        verification: "0x21c4171d16e4ea31b1f251e5b9e4e2cd15b75fda",
        tokenization_manager: "0x8aa03f4bcdd3fdbe6d4a73e43e0a1cc8e3e5c29b",
        payment_token: "0x5425890298aed601595a70ab815c96711a31bc65",
    },
    ChainEntry {
        descriptor: NetworkDescriptor {
            chain_id: SEPOLIA,
            chain_name: "Sepolia Testnet",
            rpc_url: "https://rpc.sepolia.org",
            explorer_url: "https://sepolia.etherscan.io",
            currency: NativeCurrency {
                symbol: "ETH",
                decimals: 18,
            },
        },
        estate_registry: "0x2bd1f5f2b95b81af8ac21b1b4f7a0bbd6c724d0e",
        verification: "0x9e42dd64f2baf9e5ad0b92339ad0a8a1ed73e0c4",
        tokenization_manager: "0x71f8c5b4dc9a2e52f56e3b8d8a62c0a5f0d3bd11",
        payment_token: "0x94a9d9ac8a22534e3faca9f4e7f2e2cf85d5e4c8",
    },
];

/// Static map from chain id to network descriptor and contract deployment.
///
/// Built once at startup; construction fails if any supported chain is
/// missing any of the four contract addresses, so a half-configured chain can
/// never be selected at runtime.
pub struct ChainRegistry {
    chains: BTreeMap<ChainId, (NetworkDescriptor, Deployment)>,
}

impl ChainRegistry {
    pub fn new() -> Result<Self, ChainError> {
        Self::from_entries(SUPPORTED)
    }

    fn from_entries(entries: &[ChainEntry]) -> Result<Self, ChainError> {
        let mut chains = BTreeMap::new();
        for entry in entries {
            let chain_id = entry.descriptor.chain_id;
            let deployment = Deployment {
                estate_registry: parse_address(chain_id, "estate_registry", entry.estate_registry)?,
                verification: parse_address(chain_id, "verification", entry.verification)?,
                tokenization_manager: parse_address(
                    chain_id,
                    "tokenization_manager",
                    entry.tokenization_manager,
                )?,
                payment_token: parse_address(chain_id, "payment_token", entry.payment_token)?,
            };
            if chains
                .insert(chain_id, (entry.descriptor, deployment))
                .is_some()
            {
                return Err(ChainError::RegistryInvalid {
                    reason: format!("duplicate entry for chain id {chain_id}"),
                });
            }
        }
        Ok(Self { chains })
    }

    /// The supported chain ids, in ascending order.
    pub fn supported_chains(&self) -> Vec<ChainId> {
        self.chains.keys().copied().collect()
    }

    pub fn is_supported(&self, chain_id: ChainId) -> bool {
        self.chains.contains_key(&chain_id)
    }

    pub fn descriptor(&self, chain_id: ChainId) -> Option<&NetworkDescriptor> {
        self.chains.get(&chain_id).map(|(descriptor, _)| descriptor)
    }

    pub fn deployment(&self, chain_id: ChainId) -> Option<&Deployment> {
        self.chains.get(&chain_id).map(|(_, deployment)| deployment)
    }

    /// All descriptors, in chain id order.
    pub fn descriptors(&self) -> Vec<NetworkDescriptor> {
        self.chains
            .values()
            .map(|(descriptor, _)| *descriptor)
            .collect()
    }
}

fn parse_address(
    chain_id: ChainId,
    contract: &str,
    value: &str,
) -> Result<Address, ChainError> {
    if value.is_empty() {
        return Err(ChainError::RegistryInvalid {
            reason: format!("chain {chain_id} is missing the {contract} address"),
        });
    }
    value.parse().map_err(|_| ChainError::RegistryInvalid {
        reason: format!("chain {chain_id} has an invalid {contract} address '{value}'"),
    })
}
