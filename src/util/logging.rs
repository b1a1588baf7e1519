//! Browser console logging.
//!
//! Routes the `log` facade to the devtools console and installs the panic
//! hook. Outside the browser build this is a no-op; the host process owns its
//! own logger.

/// Install console logging at `level`. Safe to call more than once.
pub fn init(level: log::LevelFilter) {
    #[cfg(feature = "hydrate")]
    {
        console_error_panic_hook::set_once();
        if let Some(level) = level.to_level() {
            let _ = console_log::init_with_level(level);
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = level;
    }
}
