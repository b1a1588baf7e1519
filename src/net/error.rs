//! Failure taxonomy for the session endpoints and durable token storage.
//!
//! ERROR HANDLING
//! ==============
//! The initializer only distinguishes "credential rejected" from "everything
//! else": `Unauthorized` and `MalformedStorage` lead to a refresh attempt,
//! `TransientFailure` leads straight to the expired fallback.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Errors produced by the verification, profile, and refresh calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The server rejected the credential (HTTP 401/403).
    #[error("credential rejected")]
    Unauthorized,

    /// Network failure, server error, or an undecodable response body.
    #[error("transient failure: {0}")]
    TransientFailure(String),

    /// A stored token exists but cannot be used.
    #[error("malformed stored credential: {0}")]
    MalformedStorage(String),
}

impl AuthError {
    /// Whether the initializer should treat this failure as a rejected
    /// credential and try the refresh path.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::MalformedStorage(_))
    }
}

/// Map a non-success HTTP status to an [`AuthError`].
#[must_use]
pub fn classify_status(status: u16) -> AuthError {
    match status {
        401 | 403 => AuthError::Unauthorized,
        other => AuthError::TransientFailure(format!("unexpected status: {other}")),
    }
}
