//! Logging setup and per-module switchable log macros.
//!
//! A module opts in by declaring the flag and importing the macros, which are
//! exported at the crate root:
//!
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//! use crate::{log_error, log_info, log_warn};
//! ```
//! Flipping the flag to `false` silences the sensing loop or session
//! controller without touching `RUST_LOG`.

use log::LevelFilter;

/// Installs `env_logger` with an `Info` default that `RUST_LOG` overrides.
/// Repeated calls, e.g. from an app relaunch in the same process, are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .try_init();
}

/// `log::info!` gated by the calling module's `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// `log::warn!` gated by the calling module's `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// `log::error!` gated by the calling module's `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
