//! Notification surface (C9) — a level-gated macro in the teacher's
//! `cli::constants::displaylevel!` spirit, not `log`/`tracing`.
//!
//! Library codecs (C1–C7) never call this; only the CLI and the default
//! blocking `Provider` use it, to keep the codecs pure functions per
//! spec.md §5.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::config::NotifyLevel;

static LEVEL: AtomicU8 = AtomicU8::new(NotifyLevel::Info as u8);

/// Sets the process-wide notification level (called once by the CLI after
/// parsing `-v`/`-q`/the environment default).
pub fn set_level(level: NotifyLevel) {
    LEVEL.store(level as u8, Ordering::Relaxed);
}

/// The current notification level.
pub fn current_level() -> NotifyLevel {
    match LEVEL.load(Ordering::Relaxed) {
        0 => NotifyLevel::Quiet,
        2 => NotifyLevel::Verbose,
        _ => NotifyLevel::Info,
    }
}

/// Writes to stderr when the current level is `>=` `$level`.
///
/// ```ignore
/// displaylevel!(NotifyLevel::Verbose, "selected {} ({} -> {} bytes)", alg, orig, enc);
/// ```
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::notify::current_level() >= $level {
            eprintln!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_level_round_trips() {
        set_level(NotifyLevel::Verbose);
        assert_eq!(current_level(), NotifyLevel::Verbose);
        set_level(NotifyLevel::Quiet);
        assert_eq!(current_level(), NotifyLevel::Quiet);
        set_level(NotifyLevel::Info);
    }
}
