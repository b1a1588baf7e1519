//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `guards` holds the pure route gates, `auth` the Leptos glue that applies
//! them, and `logging` the browser logger setup.

pub mod auth;
pub mod guards;
pub mod logging;
