//! # storefront-session
//!
//! Client-side session lifecycle for the storefront web client: reconciling
//! stored credentials at startup, renewing an expired access token once, and
//! gating administrative and customer-only routes.
//!
//! The storefront's Leptos pages mount the session with
//! [`util::auth::provide_session`] and guard their routes with
//! [`util::guards`]. Everything else in this crate is reachable from those
//! two entry points.

pub mod config;
pub mod net;
pub mod state;
pub mod util;

/// Browser entry point: install console logging at the configured level.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn init_logging() {
    let level = match config::SessionConfig::from_build_env() {
        Ok(cfg) => cfg.log_level.0,
        Err(e) => {
            util::logging::init(log::LevelFilter::Info);
            log::warn!("storefront config invalid, using defaults: {e}");
            return;
        }
    };
    util::logging::init(level);
}
