//! Authenticated caller identity.

use std::fmt;
use std::str::FromStr;

use super::Link;

/// Role attached to a caller by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Member,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "member" => Ok(Role::Member),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// Opaque identity claims of the caller of an authenticated endpoint.
///
/// Inserted into request extensions by [`crate::api::middleware::auth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub owner: String,
    pub role: Role,
}

impl Caller {
    pub fn new(owner: impl Into<String>, role: Role) -> Self {
        Self {
            owner: owner.into(),
            role,
        }
    }

    /// Owners may modify their own links; admins may modify any link.
    pub fn can_manage(&self, link: &Link) -> bool {
        self.role == Role::Admin || link.owner == self.owner
    }
}
