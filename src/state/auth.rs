//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to coordinate login redirects
//! and identity-dependent rendering. Provided as an `RwSignal<AuthState>` and
//! kept in sync with the session store by a store observer.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use super::session::Session;
use crate::net::types::UserClaims;

/// Reactive mirror of the session store plus the startup loading flag.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub session: Session,
    /// True until the startup initializer has settled.
    pub loading: bool,
}

impl AuthState {
    /// State installed at mount, before the initializer runs.
    #[must_use]
    pub fn starting(session: Session) -> Self {
        Self { session, loading: true }
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserClaims> {
        self.session.user()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}
