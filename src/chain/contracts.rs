use alloy::sol;

use super::{BlockchainProvider, error::ChainError, registry::Deployment};
use crate::types::ChainId;

sol! {
    /// Registry of estates: submission by owners, lookups by everyone.
    #[sol(rpc)]
    contract EstateRegistry {
        function registerEstate(string metadataURI, uint256 valuation) external returns (uint256 estateId);
        function getEstate(uint256 estateId) external view returns (address owner, string memory metadataURI, uint256 valuation, bool verified, bool tokenized);
        function estatesOf(address owner) external view returns (uint256[] memory);
        function estateCount() external view returns (uint256);
    }
}

sol! {
    /// Operator registration, collateral, estate verification, and rewards.
    #[sol(rpc)]
    contract Verification {
        function approveOperator(address operator) external;
        function isApprovedOperator(address operator) external view returns (bool);
        function depositCollateral(uint256 amount) external;
        function withdrawCollateral(uint256 amount) external;
        function collateralOf(address operator) external view returns (uint256);
        function verifyEstate(uint256 estateId) external;
        function claimRewards() external;
        function rewardsOf(address operator) external view returns (uint256);
    }
}

sol! {
    /// Fractional listings over verified estates and the buy/sell paths.
    #[sol(rpc)]
    contract TokenizationManager {
        function createListing(uint256 estateId, uint256 supply, uint256 pricePerToken) external;
        function getListing(uint256 estateId) external view returns (uint256 supply, uint256 remaining, uint256 pricePerToken, bool active);
        function buyTokens(uint256 estateId, uint256 quantity) external;
        function sellTokens(uint256 estateId, uint256 quantity) external;
        function balanceOf(address investor, uint256 estateId) external view returns (uint256);
    }
}

sol! {
    /// ERC-20 settlement token used for collateral and purchases.
    #[sol(rpc)]
    contract PaymentToken {
        function approve(address spender, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function decimals() external view returns (uint8);
    }
}

/// Contract handles bound to one signer provider on one chain.
///
/// A set is built whole and discarded whole: after a chain switch the stale
/// set's `chain_id` no longer matches the session and callers must resolve a
/// fresh one. Handles are never swapped in place.
pub struct ContractSet {
    chain_id: ChainId,
    estate_registry: EstateRegistry::EstateRegistryInstance<BlockchainProvider>,
    verification: Verification::VerificationInstance<BlockchainProvider>,
    tokenization_manager: TokenizationManager::TokenizationManagerInstance<BlockchainProvider>,
    payment_token: PaymentToken::PaymentTokenInstance<BlockchainProvider>,
}

impl ContractSet {
    /// Instantiate all four handles against one provider.
    pub(crate) fn bind(
        chain_id: ChainId,
        deployment: &Deployment,
        provider: BlockchainProvider,
    ) -> Self {
        Self {
            chain_id,
            estate_registry: EstateRegistry::new(deployment.estate_registry, provider.clone()),
            verification: Verification::new(deployment.verification, provider.clone()),
            tokenization_manager: TokenizationManager::new(
                deployment.tokenization_manager,
                provider.clone(),
            ),
            payment_token: PaymentToken::new(deployment.payment_token, provider),
        }
    }

    /// The chain this set was built on.
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn estate_registry(&self) -> &EstateRegistry::EstateRegistryInstance<BlockchainProvider> {
        &self.estate_registry
    }

    pub fn verification(&self) -> &Verification::VerificationInstance<BlockchainProvider> {
        &self.verification
    }

    pub fn tokenization_manager(
        &self,
    ) -> &TokenizationManager::TokenizationManagerInstance<BlockchainProvider> {
        &self.tokenization_manager
    }

    pub fn payment_token(&self) -> &PaymentToken::PaymentTokenInstance<BlockchainProvider> {
        &self.payment_token
    }

    /// Guard against acting through a set built before a chain switch.
    pub(crate) fn ensure_chain(&self, active: ChainId) -> Result<(), ChainError> {
        if self.chain_id != active {
            return Err(ChainError::StaleContracts {
                built_on: self.chain_id,
                active,
            });
        }
        Ok(())
    }
}
