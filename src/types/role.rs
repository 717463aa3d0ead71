use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A user role recognized by the protocol.
///
/// The wire strings match what the backend and the persisted session file
/// use ("user" is the investor role). Absence of a role is `Option<Role>`,
/// not a variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "node-operator")]
    NodeOperator,
    #[serde(rename = "estate-owner")]
    EstateOwner,
    #[serde(rename = "user")]
    Investor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::NodeOperator => "node-operator",
            Role::EstateOwner => "estate-owner",
            Role::Investor => "user",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "node-operator" => Ok(Role::NodeOperator),
            "estate-owner" => Ok(Role::EstateOwner),
            "user" => Ok(Role::Investor),
            _ => Err(format!("'{}' is not a valid role", s)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
