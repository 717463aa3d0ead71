use serde::{Deserialize, Serialize};

/// Integer identifier of an EVM network.
///
/// The protocol is deployed on two test networks in this snapshot:
/// Avalanche Fuji (43113) and Ethereum Sepolia (11155111).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ChainId(u64);

/// Avalanche Fuji Testnet.
pub const FUJI: ChainId = ChainId(43_113);

/// Ethereum Sepolia Testnet.
pub const SEPOLIA: ChainId = ChainId(11_155_111);

impl ChainId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ChainId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::str::FromStr for ChainId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}
