//! Route gates for the administrative and customer surfaces.
//!
//! Gates are pure predicates over already-reconciled state. They never call
//! the network and never mutate anything, so evaluating one twice against the
//! same input gives the same decision.

#[cfg(test)]
#[path = "guards_test.rs"]
mod guards_test;

use crate::config::{DEFAULT_ADMIN_LOGIN_PATH, DEFAULT_LOGIN_PATH, DEFAULT_ROOT_PATH, Routes};
use crate::state::admin::{AdminSession, is_well_formed_flag};
use crate::state::session::{Role, RoleParseError, Session};

/// Result of evaluating a gate for one navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateDecision {
    Admit,
    Redirect(String),
}

impl GateDecision {
    #[must_use]
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admit)
    }

    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Admit => None,
            Self::Redirect(to) => Some(to),
        }
    }
}

/// Admits when an administrator is signed in. No role distinctions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminGate {
    login_path: String,
}

impl Default for AdminGate {
    fn default() -> Self {
        Self { login_path: DEFAULT_ADMIN_LOGIN_PATH.to_owned() }
    }
}

impl AdminGate {
    #[must_use]
    pub fn new(login_path: impl Into<String>) -> Self {
        Self { login_path: login_path.into() }
    }

    #[must_use]
    pub fn from_routes(routes: &Routes) -> Self {
        Self::new(routes.admin_login.clone())
    }

    /// Decide from a raw stored flag value.
    #[must_use]
    pub fn evaluate_flag(&self, flag: Option<&str>) -> GateDecision {
        if is_well_formed_flag(flag) {
            GateDecision::Admit
        } else {
            GateDecision::Redirect(self.login_path.clone())
        }
    }

    #[must_use]
    pub fn evaluate(&self, admin: &AdminSession) -> GateDecision {
        self.evaluate_flag(admin.flag().as_deref())
    }
}

/// Admits authenticated customers, optionally requiring one of `roles`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimGate {
    roles: Vec<Role>,
    unauthenticated_redirect: String,
    forbidden_redirect: String,
}

impl Default for ClaimGate {
    fn default() -> Self {
        Self {
            roles: Vec::new(),
            unauthenticated_redirect: DEFAULT_LOGIN_PATH.to_owned(),
            forbidden_redirect: DEFAULT_ROOT_PATH.to_owned(),
        }
    }
}

impl ClaimGate {
    /// Any authenticated user; redirects to the default login path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_routes(routes: &Routes) -> Self {
        Self {
            roles: Vec::new(),
            unauthenticated_redirect: routes.login.clone(),
            forbidden_redirect: routes.root.clone(),
        }
    }

    /// Require at least one of `roles`.
    #[must_use]
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    /// Like [`ClaimGate::with_roles`], parsing role names such as `"customer"`.
    ///
    /// # Errors
    ///
    /// Returns a [`RoleParseError`] for the first unknown name.
    pub fn with_role_names<'a>(self, names: impl IntoIterator<Item = &'a str>) -> Result<Self, RoleParseError> {
        let roles = names.into_iter().map(str::parse).collect::<Result<Vec<Role>, _>>()?;
        Ok(self.with_roles(roles))
    }

    /// Where to send visitors without a session.
    #[must_use]
    pub fn redirect_to(mut self, path: impl Into<String>) -> Self {
        self.unauthenticated_redirect = path.into();
        self
    }

    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    #[must_use]
    pub fn evaluate(&self, session: &Session) -> GateDecision {
        if !session.is_authenticated() {
            return GateDecision::Redirect(self.unauthenticated_redirect.clone());
        }
        if session.has_any_role(&self.roles) {
            GateDecision::Admit
        } else {
            GateDecision::Redirect(self.forbidden_redirect.clone())
        }
    }
}
