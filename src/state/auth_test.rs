use super::*;
use crate::state::test_helpers::claims;

// =============================================================
// AuthState defaults
// =============================================================

#[test]
fn auth_state_default_no_user() {
    let state = AuthState::default();
    assert!(state.user().is_none());
    assert!(!state.is_authenticated());
}

#[test]
fn auth_state_default_not_loading() {
    let state = AuthState::default();
    assert!(!state.loading);
}

#[test]
fn auth_state_starting_is_loading() {
    let state = AuthState::starting(Session::anonymous());
    assert!(state.loading);
    assert!(!state.is_authenticated());
}

#[test]
fn auth_state_exposes_session_user() {
    let state = AuthState {
        session: Session::authenticated("a".to_owned(), None, claims(true, false)),
        loading: false,
    };
    assert!(state.is_authenticated());
    assert_eq!(state.user().map(|u| u.email.as_str()), Some("ada@example.com"));
}
