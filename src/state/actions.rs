//! Explicit sign-in and sign-out.
//!
//! The login form itself lives in the UI layer; once it has a token pair and
//! claims it hands them here so the store, durable storage, and listeners all
//! move together.

#[cfg(test)]
#[path = "actions_test.rs"]
mod actions_test;

use super::events::{EventSink, SessionEvent};
use super::session::Session;
use super::store::SessionStore;
use crate::net::types::{TokenPair, UserClaims};

/// Install an authenticated snapshot for a freshly logged-in user.
pub fn sign_in(store: &SessionStore, events: &dyn EventSink, tokens: TokenPair, user: UserClaims) {
    let refresh = Some(tokens.refresh_token).filter(|t| !t.trim().is_empty());
    store.replace(Session::authenticated(tokens.access_token, refresh, user));
    log::info!("session: signed in");
    events.emit(SessionEvent::SignedIn);
}

/// Clear the session, broadcast the logout, and send the user to `login_path`.
pub fn sign_out(store: &SessionStore, events: &dyn EventSink, login_path: &str) {
    store.clear();
    log::info!("session: signed out");
    events.emit(SessionEvent::LoggedOut);
    events.emit(SessionEvent::Redirect { to: login_path.to_owned() });
}
