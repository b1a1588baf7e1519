//! Session store: the single owner of the customer session snapshot.
//!
//! ARCHITECTURE
//! ============
//! A cloneable handle around shared state. Readers get owned snapshots;
//! writers swap whole snapshots. Tokens are mirrored to durable storage inside
//! the write lock, and observers run after the lock is released so they may
//! read the store (or subscribe) from their callback.
//!
//! TRADE-OFFS
//! ==========
//! Mirroring compares against what is already stored and skips equal values,
//! so re-installing the tokens that were just read at startup costs no writes.
//!
//! Every replace/clear bumps a generation counter under the write lock. Slow
//! writers (the startup check) capture it first and install through the
//! `*_if_unchanged` variants, so they never overwrite a newer sign-in.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use super::session::Session;
use super::storage::TokenStorage;
use crate::config::StorageKeys;

/// Handle returned by [`SessionStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Arc<dyn Fn(&Session) + Send + Sync>;

struct Inner {
    snapshot: RwLock<Session>,
    observers: Mutex<Vec<(SubscriptionId, Observer)>>,
    next_id: AtomicU64,
    generation: AtomicU64,
    storage: Arc<dyn TokenStorage>,
    keys: StorageKeys,
}

/// Shared handle to the session snapshot.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("snapshot", &self.read())
            .field("keys", &self.inner.keys)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create an empty store backed by `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn TokenStorage>, keys: StorageKeys) -> Self {
        Self {
            inner: Arc::new(Inner {
                snapshot: RwLock::new(Session::anonymous()),
                observers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
                generation: AtomicU64::new(0),
                storage,
                keys,
            }),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn read(&self) -> Session {
        self.inner.snapshot.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Swap in `next`, mirror its tokens, and notify observers.
    pub fn replace(&self, next: Session) {
        self.install(next, false, None);
    }

    /// Reset to the anonymous snapshot and erase both token slots.
    pub fn clear(&self) {
        self.install(Session::anonymous(), true, None);
    }

    /// Number of replace/clear calls applied so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }

    /// [`replace`](Self::replace), but only if nothing was installed since
    /// `generation` was read. Returns whether the snapshot was swapped.
    pub fn replace_if_unchanged(&self, generation: u64, next: Session) -> bool {
        self.install(next, false, Some(generation))
    }

    /// [`clear`](Self::clear), but only if nothing was installed since
    /// `generation` was read. Returns whether the store was cleared.
    pub fn clear_if_unchanged(&self, generation: u64) -> bool {
        self.install(Session::anonymous(), true, Some(generation))
    }

    /// Register `observer`; it runs after every replace/clear, in
    /// subscription order.
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&Session) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(observer)));
        id
    }

    /// Drop a registration. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.inner.observers.lock().unwrap_or_else(PoisonError::into_inner);
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    #[must_use]
    pub fn storage(&self) -> &dyn TokenStorage {
        self.inner.storage.as_ref()
    }

    #[must_use]
    pub fn keys(&self) -> &StorageKeys {
        &self.inner.keys
    }

    fn install(&self, next: Session, erase: bool, expected: Option<u64>) -> bool {
        let snapshot = {
            let mut current = self.inner.snapshot.write().unwrap_or_else(PoisonError::into_inner);
            if expected.is_some_and(|g| g != self.generation()) {
                return false;
            }
            self.inner.generation.fetch_add(1, Ordering::AcqRel);
            if erase {
                self.erase_slot(&self.inner.keys.access_token);
                self.erase_slot(&self.inner.keys.refresh_token);
            } else if !current.same_tokens(&next) {
                self.mirror_slot(&self.inner.keys.access_token, next.access_token());
                self.mirror_slot(&self.inner.keys.refresh_token, next.refresh_token());
            }
            *current = next;
            current.clone()
        };

        let observers: Vec<Observer> = self
            .inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer(&snapshot);
        }
        true
    }

    fn mirror_slot(&self, key: &str, value: Option<&str>) {
        let stored = match self.inner.storage.get(key) {
            Ok(stored) => stored,
            Err(e) => {
                log::warn!("session store: reading {key} before mirror failed: {e}");
                None
            }
        };
        if stored.as_deref() == value {
            return;
        }
        let result = match value {
            Some(v) => self.inner.storage.set(key, v),
            None => self.inner.storage.remove(key),
        };
        if let Err(e) = result {
            log::warn!("session store: mirroring {key} failed: {e}");
        }
    }

    fn erase_slot(&self, key: &str) {
        if let Err(e) = self.inner.storage.remove(key) {
            log::warn!("session store: erasing {key} failed: {e}");
        }
    }
}
