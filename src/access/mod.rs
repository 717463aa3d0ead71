//! Role-gated access control.
//!
//! A small state machine over the session (connected? role assumed?) and a
//! router that checks it on every call. There is no caching: a view is either
//! permitted against the state as it is right now, or the caller is told to
//! fall back to [`View::Home`].

use alloy::primitives::Address;

use crate::types::Role;

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("Cannot assume a role while disconnected")]
    NotConnected,
}

/// Session standing, advanced by wallet and role events.
///
/// `disconnected` returns any state to `Anonymous`; a session is always
/// revocable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessState {
    #[default]
    Anonymous,
    RoleUnset {
        address: Address,
    },
    RoleActive {
        address: Address,
        role: Role,
    },
}

impl AccessState {
    /// A wallet connection (or account switch). An already assumed role is
    /// kept; only the address moves.
    pub fn connected(&mut self, address: Address) {
        *self = match *self {
            AccessState::RoleActive { role, .. } => AccessState::RoleActive { address, role },
            _ => AccessState::RoleUnset { address },
        };
    }

    /// Adopt (or change) the role for the connected address.
    pub fn role_assumed(&mut self, role: Role) -> Result<(), AccessError> {
        let address = match *self {
            AccessState::Anonymous => return Err(AccessError::NotConnected),
            AccessState::RoleUnset { address } | AccessState::RoleActive { address, .. } => address,
        };
        *self = AccessState::RoleActive { address, role };
        Ok(())
    }

    /// Wallet disconnect or logout.
    pub fn disconnected(&mut self) {
        *self = AccessState::Anonymous;
    }

    pub fn address(&self) -> Option<Address> {
        match self {
            AccessState::Anonymous => None,
            AccessState::RoleUnset { address } | AccessState::RoleActive { address, .. } => {
                Some(*address)
            }
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            AccessState::RoleActive { role, .. } => Some(*role),
            _ => None,
        }
    }
}

/// The navigable views. One dashboard per role, plus the open landing view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    AdminDashboard,
    OperatorDashboard,
    OwnerDashboard,
    InvestorDashboard,
}

impl View {
    pub fn required_role(&self) -> Option<Role> {
        match self {
            View::Home => None,
            View::AdminDashboard => Some(Role::Admin),
            View::OperatorDashboard => Some(Role::NodeOperator),
            View::OwnerDashboard => Some(Role::EstateOwner),
            View::InvestorDashboard => Some(Role::Investor),
        }
    }
}

/// Where to send a caller that may not see the requested view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub to: View,
}

impl Redirect {
    fn home() -> Self {
        Self { to: View::Home }
    }
}

/// Decide whether `view` may render for `state`.
///
/// Evaluated fresh on every call. Any mismatch redirects home: not connected,
/// connected without a role, or connected with the wrong role.
pub fn route(state: &AccessState, view: View) -> Result<(), Redirect> {
    let Some(required) = view.required_role() else {
        return Ok(());
    };

    match state {
        AccessState::RoleActive { role, .. } if *role == required => Ok(()),
        _ => Err(Redirect::home()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn addr() -> Address {
        Address::repeat_byte(0x42)
    }

    #[test]
    fn home_is_open_to_everyone() {
        assert!(route(&AccessState::Anonymous, View::Home).is_ok());

        let mut state = AccessState::Anonymous;
        state.connected(addr());
        assert!(route(&state, View::Home).is_ok());

        state.role_assumed(Role::Admin).unwrap();
        assert!(route(&state, View::Home).is_ok());
    }

    #[test]
    fn anonymous_is_redirected_from_dashboards() {
        let state = AccessState::Anonymous;
        let redirect = route(&state, View::InvestorDashboard).unwrap_err();
        assert_eq!(redirect.to, View::Home);
    }

    #[test]
    fn connected_without_role_is_redirected() {
        let mut state = AccessState::Anonymous;
        state.connected(addr());
        assert!(route(&state, View::OwnerDashboard).is_err());
    }

    #[test]
    fn wrong_role_is_redirected() {
        let mut state = AccessState::Anonymous;
        state.connected(addr());
        state.role_assumed(Role::Investor).unwrap();

        assert!(route(&state, View::AdminDashboard).is_err());
        assert!(route(&state, View::OperatorDashboard).is_err());
        assert!(route(&state, View::OwnerDashboard).is_err());
    }

    #[test]
    fn matching_role_renders() {
        let mut state = AccessState::Anonymous;
        state.connected(addr());
        state.role_assumed(Role::NodeOperator).unwrap();

        assert!(route(&state, View::OperatorDashboard).is_ok());
    }

    #[test]
    fn role_cannot_be_assumed_while_disconnected() {
        let mut state = AccessState::Anonymous;
        assert!(matches!(
            state.role_assumed(Role::Admin),
            Err(AccessError::NotConnected)
        ));
        assert_eq!(state, AccessState::Anonymous);
    }

    #[test]
    fn disconnect_revokes_everything() {
        let mut state = AccessState::Anonymous;
        state.connected(addr());
        state.role_assumed(Role::EstateOwner).unwrap();

        state.disconnected();
        assert_eq!(state, AccessState::Anonymous);
        assert!(route(&state, View::OwnerDashboard).is_err());
    }

    #[test]
    fn account_switch_keeps_the_role() {
        let mut state = AccessState::Anonymous;
        state.connected(addr());
        state.role_assumed(Role::Investor).unwrap();

        let other = Address::repeat_byte(0x43);
        state.connected(other);
        assert_eq!(state.address(), Some(other));
        assert_eq!(state.role(), Some(Role::Investor));
    }
}
