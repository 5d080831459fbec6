//! Process-wide state for gridkit.

use std::sync::{OnceLock, PoisonError, RwLock};

use crate::options::Options;

/// Global options singleton.
static OPTIONS: OnceLock<RwLock<Options>> = OnceLock::new();

fn options_lock() -> &'static RwLock<Options> {
    OPTIONS.get_or_init(|| RwLock::new(Options::default()))
}

/// Access the global options for reading.
pub fn with_options<F, R>(f: F) -> R
where
    F: FnOnce(&Options) -> R,
{
    let guard = options_lock()
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    f(&guard)
}

/// Access the global options for writing.
pub fn with_options_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut Options) -> R,
{
    let mut guard = options_lock()
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

/// Formats a floating value with the global options.
pub fn format_float(value: f64) -> String {
    with_options(|opts| opts.format_float(value))
}

/// Resets the global options to their defaults.
pub fn reset_options() {
    with_options_mut(|opts| *opts = Options::default());
    log::debug!("gridkit options reset to defaults");
}
