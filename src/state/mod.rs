//! Client-side session state.
//!
//! DESIGN
//! ======
//! `store` owns the snapshot, `initializer` fills it at startup, `actions`
//! cover explicit sign-in/sign-out, and `admin` keeps the administrative flag
//! in its own slot. `auth` is the reactive view handed to Leptos components.

pub mod actions;
pub mod admin;
pub mod auth;
pub mod events;
pub mod initializer;
pub mod session;
pub mod storage;
pub mod store;

#[cfg(test)]
pub mod test_helpers {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::events::{EventSink, SessionEvent};
    use super::initializer::Liveness;
    use super::storage::{MemoryStorage, StorageError, TokenStorage};
    use super::store::SessionStore;
    use crate::config::StorageKeys;
    use crate::net::api::AuthApi;
    use crate::net::error::AuthError;
    use crate::net::types::UserClaims;

    /// Claims for user `u-1` with the given role flags.
    #[must_use]
    pub fn claims(is_customer: bool, is_vendor: bool) -> UserClaims {
        UserClaims {
            identifier: "u-1".to_owned(),
            email: "ada@example.com".to_owned(),
            is_customer,
            is_vendor,
            extra: serde_json::Map::new(),
        }
    }

    /// Memory storage that counts every `set`/`remove`.
    #[derive(Default)]
    pub struct RecordingStorage {
        inner: MemoryStorage,
        writes: AtomicUsize,
    }

    impl RecordingStorage {
        #[must_use]
        pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
            Self { inner: MemoryStorage::with_entries(entries), writes: AtomicUsize::new(0) }
        }

        #[must_use]
        pub fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        #[must_use]
        pub fn value(&self, key: &str) -> Option<String> {
            self.inner.get(key).unwrap()
        }
    }

    impl TokenStorage for RecordingStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.remove(key)
        }
    }

    /// Storage whose every operation fails.
    pub struct BrokenStorage;

    impl TokenStorage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    /// A store over recording storage seeded with `entries`.
    #[must_use]
    pub fn store_with<'a>(
        entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> (SessionStore, Arc<RecordingStorage>) {
        let storage = Arc::new(RecordingStorage::with_entries(entries));
        let store = SessionStore::new(storage.clone(), StorageKeys::default());
        (store, storage)
    }

    /// Event sink that keeps everything it receives.
    #[derive(Default)]
    pub struct RecordingSink {
        events: Mutex<Vec<SessionEvent>>,
    }

    impl RecordingSink {
        #[must_use]
        pub fn events(&self) -> Vec<SessionEvent> {
            self.events.lock().unwrap().clone()
        }

        #[must_use]
        pub fn count(&self, event: &SessionEvent) -> usize {
            self.events.lock().unwrap().iter().filter(|e| *e == event).count()
        }
    }

    impl EventSink for RecordingSink {
        fn emit(&self, event: SessionEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Call {
        Verify(String),
        Profile(String),
        Refresh(String),
    }

    /// Scripted endpoints.
    ///
    /// Tokens registered with `accepting` verify; any other token fails
    /// verification with `verify_error` (default `Unauthorized`). Refresh
    /// tokens registered with `refreshing` yield a new access token that the
    /// profile endpoint then accepts.
    pub struct MockApi {
        user: UserClaims,
        valid: Mutex<HashSet<String>>,
        verify_error: AuthError,
        refresh: Vec<(String, Result<String, AuthError>)>,
        profile_error: Option<AuthError>,
        retire_on_verify: Option<Liveness>,
        calls: Mutex<Vec<Call>>,
    }

    impl MockApi {
        #[must_use]
        pub fn new(user: UserClaims) -> Self {
            Self {
                user,
                valid: Mutex::new(HashSet::new()),
                verify_error: AuthError::Unauthorized,
                refresh: Vec::new(),
                profile_error: None,
                retire_on_verify: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        #[must_use]
        pub fn accepting(self, token: &str) -> Self {
            self.valid.lock().unwrap().insert(token.to_owned());
            self
        }

        #[must_use]
        pub fn verify_fails_with(mut self, err: AuthError) -> Self {
            self.verify_error = err;
            self
        }

        #[must_use]
        pub fn refreshing(mut self, refresh_token: &str, new_access: &str) -> Self {
            self.refresh.push((refresh_token.to_owned(), Ok(new_access.to_owned())));
            self
        }

        #[must_use]
        pub fn refresh_fails_with(mut self, refresh_token: &str, err: AuthError) -> Self {
            self.refresh.push((refresh_token.to_owned(), Err(err)));
            self
        }

        #[must_use]
        pub fn profile_fails_with(mut self, err: AuthError) -> Self {
            self.profile_error = Some(err);
            self
        }

        #[must_use]
        pub fn retiring_on_verify(mut self, liveness: Liveness) -> Self {
            self.retire_on_verify = Some(liveness);
            self
        }

        #[must_use]
        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        #[must_use]
        pub fn refresh_calls(&self) -> usize {
            self.calls().iter().filter(|c| matches!(c, Call::Refresh(_))).count()
        }
    }

    #[async_trait::async_trait(?Send)]
    impl AuthApi for MockApi {
        async fn verify_token(&self, token: &str) -> Result<(), AuthError> {
            self.calls.lock().unwrap().push(Call::Verify(token.to_owned()));
            if let Some(liveness) = &self.retire_on_verify {
                liveness.retire();
            }
            if self.valid.lock().unwrap().contains(token) { Ok(()) } else { Err(self.verify_error.clone()) }
        }

        async fn fetch_profile(&self, token: &str) -> Result<UserClaims, AuthError> {
            self.calls.lock().unwrap().push(Call::Profile(token.to_owned()));
            if let Some(err) = &self.profile_error {
                return Err(err.clone());
            }
            if self.valid.lock().unwrap().contains(token) {
                Ok(self.user.clone())
            } else {
                Err(AuthError::Unauthorized)
            }
        }

        async fn refresh_token(&self, refresh_token: &str) -> Result<String, AuthError> {
            self.calls.lock().unwrap().push(Call::Refresh(refresh_token.to_owned()));
            let result = self
                .refresh
                .iter()
                .find(|(token, _)| token == refresh_token)
                .map_or(Err(AuthError::Unauthorized), |(_, result)| result.clone());
            if let Ok(access) = &result {
                self.valid.lock().unwrap().insert(access.clone());
            }
            result
        }
    }
}
