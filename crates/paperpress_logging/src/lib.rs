#![deny(missing_docs)]
//! Shared logging utilities for the PaperPress workspace.
//!
//! This crate provides the `press_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. The macros forward to
//! the `log` facade through a hidden re-export, so callers do not need their
//! own `log` dependency.

#[doc(hidden)]
pub use log as __log;

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! press_trace {
    ($($arg:tt)*) => {{
        $crate::__log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! press_debug {
    ($($arg:tt)*) => {{
        $crate::__log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! press_info {
    ($($arg:tt)*) => {{
        $crate::__log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! press_warn {
    ($($arg:tt)*) => {{
        $crate::__log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! press_error {
    ($($arg:tt)*) => {{
        $crate::__log::error!($($arg)*);
    }};
}

/// Installs a stderr logger for test binaries, once per process.
///
/// The level comes from `PAPERPRESS_TEST_LOG` (any `log` level name) and
/// defaults to `debug`. Later calls, or a logger installed elsewhere, are
/// left alone.
pub fn initialize_for_tests() {
    use std::sync::Once;

    use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let level = std::env::var("PAPERPRESS_TEST_LOG")
            .ok()
            .and_then(|name| name.parse::<log::LevelFilter>().ok())
            .unwrap_or(log::LevelFilter::Debug);
        let config = ConfigBuilder::new()
            .set_time_format_rfc3339()
            .build();
        let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Never);
    });
}
