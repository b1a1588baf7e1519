//! Side-effect signals the UI layer reacts to.
//!
//! The session core never renders anything; it only announces sign-in,
//! logout, expiry, and navigation requests through an [`EventSink`].

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

/// Observable session side effects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// A user signed in and the store now holds an authenticated snapshot.
    SignedIn,
    /// The session was cleared on purpose.
    LoggedOut,
    /// The stored session could not be renewed; show a one-off notice.
    SessionExpired,
    /// Ask the router to navigate.
    Redirect { to: String },
}

/// Receiver for [`SessionEvent`]s.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: SessionEvent);
}

impl<F> EventSink for F
where
    F: Fn(SessionEvent) + Send + Sync,
{
    fn emit(&self, event: SessionEvent) {
        self(event);
    }
}

/// Sink that only logs. Used when the host has no notice surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: SessionEvent) {
        log::info!("session event: {event:?}");
    }
}
