//! Networking for the session endpoints.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` performs the HTTP calls, `error` classifies their failures, and
//! `types` defines the JSON bodies.

pub mod api;
pub mod error;
pub mod types;
