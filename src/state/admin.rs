//! Administrative session flag.
//!
//! DESIGN
//! ======
//! Administrators and customers are separate authentication domains. The
//! admin flag lives in its own storage slot, is never derived from customer
//! claims, and is not touched by the customer store or initializer.

#[cfg(test)]
#[path = "admin_test.rs"]
mod admin_test;

use std::fmt;
use std::sync::Arc;

use super::storage::{StorageError, TokenStorage};

const SIGNED_IN: &str = "true";

/// Whether a raw stored flag value means "administrator signed in".
///
/// Anything other than `true` (ignoring case and surrounding whitespace) is
/// treated as absent.
#[must_use]
pub fn is_well_formed_flag(raw: Option<&str>) -> bool {
    raw.is_some_and(|v| v.trim().eq_ignore_ascii_case(SIGNED_IN))
}

/// Handle to the administrative flag slot.
#[derive(Clone)]
pub struct AdminSession {
    storage: Arc<dyn TokenStorage>,
    key: String,
}

impl fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSession").field("key", &self.key).finish_non_exhaustive()
    }
}

impl AdminSession {
    #[must_use]
    pub fn new(storage: Arc<dyn TokenStorage>, key: impl Into<String>) -> Self {
        Self { storage, key: key.into() }
    }

    /// Raw stored value, with read failures treated as absent.
    #[must_use]
    pub fn flag(&self) -> Option<String> {
        match self.storage.get(&self.key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("admin session: reading {} failed: {e}", self.key);
                None
            }
        }
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        is_well_formed_flag(self.flag().as_deref())
    }

    /// Record a successful administrator login.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the flag cannot be written.
    pub fn sign_in(&self) -> Result<(), StorageError> {
        self.storage.set(&self.key, SIGNED_IN)?;
        log::info!("admin session: signed in");
        Ok(())
    }

    /// Forget the administrator login.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the flag cannot be removed.
    pub fn sign_out(&self) -> Result<(), StorageError> {
        self.storage.remove(&self.key)?;
        log::info!("admin session: signed out");
        Ok(())
    }
}
