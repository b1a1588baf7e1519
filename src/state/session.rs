//! The customer session snapshot and role vocabulary.
//!
//! DESIGN
//! ======
//! Fields are private so the only ways to build a snapshot are the
//! constructors below. `is_authenticated` therefore always implies that an
//! access token and user claims are present.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::fmt;
use std::str::FromStr;

use crate::net::types::UserClaims;

/// Point-in-time view of the customer session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    access_token: Option<String>,
    refresh_token: Option<String>,
    user: Option<UserClaims>,
    is_authenticated: bool,
}

impl Session {
    /// The empty, unauthenticated snapshot.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A verified session with loaded claims.
    #[must_use]
    pub fn authenticated(access_token: String, refresh_token: Option<String>, user: UserClaims) -> Self {
        Self { access_token: Some(access_token), refresh_token, user: Some(user), is_authenticated: true }
    }

    /// Tokens are known but not yet verified (no claims loaded).
    #[cfg(test)]
    #[must_use]
    pub(crate) fn pending(access_token: String, refresh_token: Option<String>) -> Self {
        Self { access_token: Some(access_token), refresh_token, user: None, is_authenticated: false }
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserClaims> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    /// Whether the user holds at least one of `roles`. An empty slice is
    /// satisfied by any authenticated user.
    #[must_use]
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        let Some(user) = self.user() else {
            return false;
        };
        roles.is_empty() || roles.iter().any(|role| role.is_held_by(user))
    }

    /// True when `other` carries the same tokens, regardless of claims.
    pub(crate) fn same_tokens(&self, other: &Session) -> bool {
        self.access_token == other.access_token && self.refresh_token == other.refresh_token
    }
}

/// Role names accepted by the claim gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Customer,
    Vendor,
}

impl Role {
    /// Map the role onto its claim flag.
    #[must_use]
    pub fn is_held_by(self, user: &UserClaims) -> bool {
        match self {
            Self::Customer => user.is_customer,
            Self::Vendor => user.is_vendor,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Vendor => "vendor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role name outside the storefront's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "vendor" => Ok(Self::Vendor),
            _ => Err(RoleParseError(s.to_owned())),
        }
    }
}
