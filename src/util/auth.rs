//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components should apply identical redirect behavior, and the session
//! must be reconciled once per mount before any of them admits a visitor.
//! `provide_session` wires the store, the admin flag, and the reactive
//! `AuthState` into context and starts the initializer.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use super::guards::{AdminGate, ClaimGate, GateDecision};
use crate::config::SessionConfig;
use crate::net::api::AuthApi;
use crate::state::admin::AdminSession;
use crate::state::auth::AuthState;
use crate::state::events::EventSink;
use crate::state::initializer::{Liveness, SessionInitializer};
use crate::state::storage::{BrowserStorage, TokenStorage};
use crate::state::store::SessionStore;

/// Where the claim gate wants to send the visitor, once loading is done.
///
/// Returns `None` while the initializer is still running so a slow
/// verification never bounces a user who is about to be admitted.
#[must_use]
pub fn pending_redirect(state: &AuthState, gate: &ClaimGate) -> Option<String> {
    if state.loading {
        return None;
    }
    gate.evaluate(&state.session).redirect_target().map(str::to_owned)
}

/// Whether guarded content may render. Denied while loading.
#[must_use]
pub fn is_admitted(state: &AuthState, gate: &ClaimGate) -> bool {
    !state.loading && gate.evaluate(&state.session).is_admitted()
}

/// Redirect whenever auth has loaded and `gate` rejects the session.
pub fn install_claim_redirect<F>(auth: RwSignal<AuthState>, gate: ClaimGate, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let state = auth.get();
        if let Some(to) = pending_redirect(&state, &gate) {
            navigate(&to, NavigateOptions::default());
        }
    });
}

/// Redirect to the admin login surface unless an administrator is signed in.
pub fn install_admin_redirect<F>(admin: AdminSession, gate: AdminGate, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if let GateDecision::Redirect(to) = gate.evaluate(&admin) {
            navigate(&to, NavigateOptions::default());
        }
    });
}

/// Mount the session for the current view tree.
///
/// Provides `SessionStore`, `AdminSession`, and `RwSignal<AuthState>` as
/// context. In the browser the initializer is spawned immediately; the
/// returned signal stays `loading` until it settles. Unmounting retires the
/// run and detaches the store observer.
pub fn provide_session<A>(config: &SessionConfig, api: A, events: Arc<dyn EventSink>) -> RwSignal<AuthState>
where
    A: AuthApi + 'static,
{
    let storage: Arc<dyn TokenStorage> = Arc::new(BrowserStorage);
    let store = SessionStore::new(storage.clone(), config.storage.clone());
    let admin = AdminSession::new(storage, config.storage.admin_flag.clone());
    let auth = RwSignal::new(AuthState::starting(store.read()));

    let subscription = store.subscribe(move |session| {
        let _ = auth.try_update(|state| state.session = session.clone());
    });

    let liveness = Liveness::new();
    let initializer = SessionInitializer::new(api, store.clone(), events, config.routes.login.clone())
        .with_liveness(liveness.clone());

    #[cfg(feature = "hydrate")]
    {
        let settled = liveness.clone();
        leptos::task::spawn_local(async move {
            if let Some(outcome) = initializer.run().await {
                log::debug!("session init settled: {outcome:?}");
                if settled.is_alive() {
                    let _ = auth.try_update(|state| state.loading = false);
                }
            }
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = initializer;
    }

    let detach = store.clone();
    on_cleanup(move || {
        liveness.retire();
        detach.unsubscribe(subscription);
    });

    provide_context(store);
    provide_context(admin);
    provide_context(auth);
    auth
}
