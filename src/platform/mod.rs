//! Platform abstraction layer
//!
//! Browser builds expose the command boundary to JavaScript through
//! [`web::WebBoard`]. Native builds drive boards directly through the CLI.

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Install the panic hook and console logger (browser only, idempotent)
#[cfg(target_arch = "wasm32")]
pub fn init_logging(level: log::Level) {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        // Fails only when a logger is already installed
        let _ = console_log::init_with_level(level);
    });
}
