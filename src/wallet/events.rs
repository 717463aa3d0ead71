use alloy::primitives::Address;
use tokio::sync::watch;

use crate::types::ChainId;

/// A single wallet notification, as delivered by [`WalletEvents::next`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletNotification {
    AccountsChanged(Vec<Address>),
    ChainChanged(ChainId),
}

/// Subscription handle for wallet notifications.
///
/// Wraps watch channels fed by the wallet implementation. Dropping the handle
/// deregisters the listener; nothing is leaked on the wallet side.
pub struct WalletEvents {
    accounts: watch::Receiver<Vec<Address>>,
    chain: watch::Receiver<ChainId>,
}

impl WalletEvents {
    pub(crate) fn new(
        accounts: watch::Receiver<Vec<Address>>,
        chain: watch::Receiver<ChainId>,
    ) -> Self {
        Self { accounts, chain }
    }

    /// Wait for the next notification on either channel.
    ///
    /// Returns `None` once the wallet side is gone.
    pub async fn next(&mut self) -> Option<WalletNotification> {
        tokio::select! {
            changed = self.accounts.changed() => {
                changed.ok()?;
                let accounts = self.accounts.borrow_and_update().clone();
                Some(WalletNotification::AccountsChanged(accounts))
            }
            changed = self.chain.changed() => {
                changed.ok()?;
                Some(WalletNotification::ChainChanged(*self.chain.borrow_and_update()))
            }
        }
    }

    /// Wait for the next `accountsChanged` notification.
    ///
    /// Returns `None` once the wallet side is gone.
    pub async fn accounts_changed(&mut self) -> Option<Vec<Address>> {
        self.accounts.changed().await.ok()?;
        Some(self.accounts.borrow_and_update().clone())
    }

    /// Wait for the next `chainChanged` notification.
    ///
    /// Returns `None` once the wallet side is gone.
    pub async fn chain_changed(&mut self) -> Option<ChainId> {
        self.chain.changed().await.ok()?;
        Some(*self.chain.borrow_and_update())
    }
}

/// Sender side of the wallet notification channels, owned by implementations.
pub(crate) struct WalletEventSenders {
    accounts: watch::Sender<Vec<Address>>,
    chain: watch::Sender<ChainId>,
}

impl WalletEventSenders {
    pub(crate) fn new(initial_accounts: Vec<Address>, initial_chain: ChainId) -> Self {
        let (accounts, _) = watch::channel(initial_accounts);
        let (chain, _) = watch::channel(initial_chain);
        Self { accounts, chain }
    }

    pub(crate) fn subscribe(&self) -> WalletEvents {
        WalletEvents::new(self.accounts.subscribe(), self.chain.subscribe())
    }

    /// Notify subscribers of a new account list. No-op if unchanged.
    pub(crate) fn accounts_changed(&self, accounts: Vec<Address>) {
        self.accounts.send_if_modified(|current| {
            if *current == accounts {
                false
            } else {
                *current = accounts;
                true
            }
        });
    }

    /// Notify subscribers of a new active chain. No-op if unchanged.
    pub(crate) fn chain_changed(&self, chain_id: ChainId) {
        self.chain.send_if_modified(|current| {
            if *current == chain_id {
                false
            } else {
                *current = chain_id;
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[tokio::test]
    async fn subscribers_see_account_changes() {
        let senders = WalletEventSenders::new(vec![], ChainId::new(43_113));
        let mut events = senders.subscribe();

        let account = Address::repeat_byte(0x11);
        senders.accounts_changed(vec![account]);

        let seen = events.accounts_changed().await.unwrap();
        assert_eq!(seen, vec![account]);
    }

    #[tokio::test]
    async fn unchanged_values_do_not_wake_subscribers() {
        let senders = WalletEventSenders::new(vec![], ChainId::new(43_113));
        let mut events = senders.subscribe();

        senders.chain_changed(ChainId::new(43_113));

        let woke = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            events.chain_changed(),
        )
        .await;
        assert!(woke.is_err(), "no notification expected for same chain");
    }

    #[tokio::test]
    async fn dropped_sender_ends_the_stream() {
        let senders = WalletEventSenders::new(vec![], ChainId::new(43_113));
        let mut events = senders.subscribe();

        drop(senders);

        assert!(events.accounts_changed().await.is_none());
    }

    #[tokio::test]
    async fn combined_stream_tags_each_notification() {
        let senders = WalletEventSenders::new(vec![], ChainId::new(43_113));
        let mut events = senders.subscribe();

        let account = Address::repeat_byte(0x22);
        senders.accounts_changed(vec![account]);
        assert_eq!(
            events.next().await,
            Some(WalletNotification::AccountsChanged(vec![account]))
        );

        senders.chain_changed(ChainId::new(11_155_111));
        assert_eq!(
            events.next().await,
            Some(WalletNotification::ChainChanged(ChainId::new(11_155_111)))
        );

        drop(senders);
        assert!(events.next().await.is_none());
    }
}
