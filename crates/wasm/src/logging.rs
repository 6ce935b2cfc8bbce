//! Browser console logging through the `console_log` backend.

use log::{Level, LevelFilter};

/// Parse a level name (`"off"`, `"error"` … `"trace"`), case-insensitive.
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    level.trim().parse().ok()
}

/// Send `log` records to the browser console and panics to
/// `console.error`. Repeat calls only move the threshold.
pub fn install(filter: LevelFilter) {
    console_error_panic_hook::set_once();
    // Errors only when a logger is already installed.
    let _ = console_log::init_with_level(filter.to_level().unwrap_or(Level::Error));
    log::set_max_level(filter);
}
