use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Dashboard role assigned to an authenticated user.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including anything missing from the permission table.
    Admin,
    /// Manages the catalogue and reviews activity.
    Manager,
    /// Handles day-to-day order processing.
    Staff,
    /// May only browse products.
    ReadOnly,
}

/// Raised when a role name does not match any known role.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(pub String);

impl Role {
    /// Every role, in descending order of privilege.
    pub const ALL: [Role; 4] = [Role::Admin, Role::Manager, Role::Staff, Role::ReadOnly];

    /// Stable name used in role metadata and permission files.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Staff => "staff",
            Role::ReadOnly => "read_only",
        }
    }

    /// Resolve an optional raw role string. Empty, missing or unrecognised
    /// values yield `None`, which the resolver treats as "deny".
    pub fn resolve(raw: Option<&str>) -> Option<Role> {
        raw.and_then(|value| value.parse().ok())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| UnknownRole(value.to_string()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("read_only".parse::<Role>(), Ok(Role::ReadOnly));
    }

    #[test]
    fn parsing_is_exact() {
        assert!("Admin".parse::<Role>().is_err());
        assert!(" staff".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn resolve_fails_closed() {
        assert_eq!(Role::resolve(None), None);
        assert_eq!(Role::resolve(Some("")), None);
        assert_eq!(Role::resolve(Some("owner")), None);
        assert_eq!(Role::resolve(Some("manager")), Some(Role::Manager));
    }
}
