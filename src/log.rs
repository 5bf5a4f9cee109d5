//! Process-wide verbosity switch for diagnostic tracing.
//!
//! Only this flag is global. Tokenizer, parser and interpreter state is
//! always per instance.

use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Write an `[azalea]`-prefixed line to stderr when verbose output is on.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        if $crate::log::is_verbose() {
            ::std::eprintln!("[azalea] {}", ::std::format_args!($($arg)*));
        }
    };
}
