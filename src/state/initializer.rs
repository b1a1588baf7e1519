//! Startup reconciliation of stored credentials.
//!
//! ARCHITECTURE
//! ============
//! An explicit phase machine driven by `run`:
//!
//! ```text
//! Unverified ──(no token)──────────────────────────────► Expired(NoToken)
//!     │
//!     ▼
//! Verifying ──(ok + profile)──────────────────────────► Authenticated
//!     │  └──(transient / profile failure)─────────────► Expired
//!     ▼ (rejected, refresh token stored)
//! Refreshing ──(ok + profile)─────────────────────────► Authenticated
//!     └──(any failure)────────────────────────────────► Expired
//! ```
//!
//! `Refreshing` only ever leads to a terminal phase, so a run makes at most
//! one refresh call. The store is written once, when a terminal phase is
//! reached; until then readers keep seeing the anonymous snapshot and guarded
//! routes stay denied.
//!
//! LIVENESS
//! ========
//! The host retires the [`Liveness`] handle on unmount. Each phase is
//! followed by a liveness check, and a retired run returns
//! [`InitOutcome::Abandoned`] without touching storage, the store, or the
//! event sink.
//!
//! A run also steps aside when the store changed after it started (for
//! example an explicit sign-in while verification was in flight). The result
//! is installed against the store generation captured at start, and a stale
//! run returns [`InitOutcome::Abandoned`] the same way.

#[cfg(test)]
#[path = "initializer_test.rs"]
mod initializer_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::events::{EventSink, SessionEvent};
use super::session::Session;
use super::store::SessionStore;
use crate::net::api::AuthApi;
use crate::net::error::AuthError;

/// Shared "is the hosting view still mounted" flag.
#[derive(Clone, Debug)]
pub struct Liveness(Arc<AtomicBool>);

impl Default for Liveness {
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl Liveness {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the host as gone. Irreversible.
    pub fn retire(&self) {
        self.0.store(false, Ordering::Release);
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Why a run ended unauthenticated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpiryReason {
    /// Nothing stored: the visitor never signed in. Not an error.
    NoToken,
    /// The access token was rejected (or unusable) and no refresh token is stored.
    Rejected,
    /// Verification failed for a reason other than rejection.
    Unreachable,
    /// The refresh call, or the profile fetch after it, failed.
    RefreshFailed,
    /// The token verified but the profile could not be loaded.
    ProfileUnavailable,
}

impl ExpiryReason {
    /// Whether the user should be told their session expired.
    #[must_use]
    pub fn notifies(self) -> bool {
        !matches!(self, Self::NoToken)
    }
}

/// Terminal result of [`SessionInitializer::run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitOutcome {
    Authenticated,
    Expired(ExpiryReason),
    /// The host unmounted, or the session was replaced, before the run
    /// settled; nothing was changed.
    Abandoned,
}

enum Terminal {
    Authenticated(Session),
    Expired(ExpiryReason),
}

enum Phase {
    Unverified,
    Verifying { access: String, refresh: Option<String> },
    Refreshing { refresh: String },
    Done(Terminal),
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Self::Unverified => "unverified",
            Self::Verifying { .. } => "verifying",
            Self::Refreshing { .. } => "refreshing",
            Self::Done(Terminal::Authenticated(_)) => "authenticated",
            Self::Done(Terminal::Expired(_)) => "expired",
        }
    }

    fn expired(reason: ExpiryReason) -> Self {
        Self::Done(Terminal::Expired(reason))
    }

    /// Where a rejected access token leads. A blank refresh slot counts as
    /// absent.
    fn after_rejection(refresh: Option<String>) -> Self {
        match refresh.filter(|t| !t.trim().is_empty()) {
            Some(refresh) => Self::Refreshing { refresh },
            None => Self::expired(ExpiryReason::Rejected),
        }
    }
}

/// Decides, once per mount, whether the browser holds a usable session.
pub struct SessionInitializer<A> {
    api: A,
    store: SessionStore,
    events: Arc<dyn EventSink>,
    login_path: String,
    liveness: Liveness,
    started: AtomicBool,
}

impl<A: AuthApi> SessionInitializer<A> {
    #[must_use]
    pub fn new(api: A, store: SessionStore, events: Arc<dyn EventSink>, login_path: impl Into<String>) -> Self {
        Self {
            api,
            store,
            events,
            login_path: login_path.into(),
            liveness: Liveness::new(),
            started: AtomicBool::new(false),
        }
    }

    /// Tie this run to an externally owned liveness flag.
    #[must_use]
    pub fn with_liveness(mut self, liveness: Liveness) -> Self {
        self.liveness = liveness;
        self
    }

    #[must_use]
    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    /// Reconcile durable storage with the endpoints and install the result.
    ///
    /// Returns `None` if this initializer has already been started; a second
    /// call never touches the network or the store.
    pub async fn run(&self) -> Option<InitOutcome> {
        if self.started.swap(true, Ordering::AcqRel) {
            log::debug!("session init: already started, ignoring re-entry");
            return None;
        }

        let generation = self.store.generation();
        let mut phase = Phase::Unverified;
        let terminal = loop {
            if !self.liveness.is_alive() {
                log::debug!("session init: host retired during {}", phase.name());
                return Some(InitOutcome::Abandoned);
            }
            log::debug!("session init: {}", phase.name());
            phase = match phase {
                Phase::Unverified => self.load_stored(),
                Phase::Verifying { access, refresh } => self.verify(access, refresh).await,
                Phase::Refreshing { refresh } => self.refresh(refresh, generation).await,
                Phase::Done(terminal) => break terminal,
            };
        };

        Some(self.settle(terminal, generation))
    }

    fn load_stored(&self) -> Phase {
        let storage = self.store.storage();
        let keys = self.store.keys();

        // Kept verbatim so an authenticated snapshot mirrors back unchanged.
        let refresh = match storage.get(&keys.refresh_token) {
            Ok(token) => token,
            Err(e) => {
                log::warn!("session init: refresh token unreadable: {e}");
                None
            }
        };

        let malformed = match storage.get(&keys.access_token) {
            Ok(None) => return Phase::expired(ExpiryReason::NoToken),
            Ok(Some(access)) if access.trim().is_empty() => {
                AuthError::MalformedStorage("blank access token".to_owned())
            }
            Ok(Some(access)) => return Phase::Verifying { access, refresh },
            Err(e) => AuthError::MalformedStorage(e.to_string()),
        };
        log::warn!("session init: {malformed}");
        Phase::after_rejection(refresh)
    }

    async fn verify(&self, access: String, refresh: Option<String>) -> Phase {
        match self.api.verify_token(&access).await {
            Ok(()) => match self.api.fetch_profile(&access).await {
                Ok(user) => Phase::Done(Terminal::Authenticated(Session::authenticated(access, refresh, user))),
                Err(e) => {
                    log::warn!("session init: profile fetch failed: {e}");
                    Phase::expired(ExpiryReason::ProfileUnavailable)
                }
            },
            Err(e) if e.is_rejection() => {
                log::debug!("session init: access token rejected");
                Phase::after_rejection(refresh)
            }
            Err(e) => {
                log::warn!("session init: verification failed: {e}");
                Phase::expired(ExpiryReason::Unreachable)
            }
        }
    }

    async fn refresh(&self, refresh: String, generation: u64) -> Phase {
        let access = match self.api.refresh_token(&refresh).await {
            Ok(access) => access,
            Err(e) => {
                log::warn!("session init: refresh failed: {e}");
                return Phase::expired(ExpiryReason::RefreshFailed);
            }
        };

        if self.liveness.is_alive() && self.store.generation() == generation {
            let key = &self.store.keys().access_token;
            if let Err(e) = self.store.storage().set(key, &access) {
                log::warn!("session init: persisting refreshed token failed: {e}");
            }
        }

        match self.api.fetch_profile(&access).await {
            Ok(user) => Phase::Done(Terminal::Authenticated(Session::authenticated(access, Some(refresh), user))),
            Err(e) => {
                log::warn!("session init: profile fetch after refresh failed: {e}");
                Phase::expired(ExpiryReason::RefreshFailed)
            }
        }
    }

    fn settle(&self, terminal: Terminal, generation: u64) -> InitOutcome {
        match terminal {
            Terminal::Authenticated(session) => {
                if !self.store.replace_if_unchanged(generation, session) {
                    return Self::superseded();
                }
                log::info!("session init: authenticated");
                InitOutcome::Authenticated
            }
            Terminal::Expired(reason) if !reason.notifies() => {
                if !self.store.replace_if_unchanged(generation, Session::anonymous()) {
                    return Self::superseded();
                }
                log::info!("session init: no stored session");
                InitOutcome::Expired(reason)
            }
            Terminal::Expired(reason) => {
                if !self.store.clear_if_unchanged(generation) {
                    return Self::superseded();
                }
                log::info!("session init: session expired ({reason:?})");
                self.events.emit(SessionEvent::SessionExpired);
                self.events.emit(SessionEvent::Redirect { to: self.login_path.clone() });
                InitOutcome::Expired(reason)
            }
        }
    }

    fn superseded() -> InitOutcome {
        log::info!("session init: session changed while in flight, leaving it alone");
        InitOutcome::Abandoned
    }
}
