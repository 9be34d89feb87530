//! Configuration defaults (C8), overridable from the environment the same
//! way the teacher's `config.rs` lets `LZ4_CLEVEL` override `CLEVEL_DEFAULT`
//! before flag parsing.
//!
//! The selector itself (`selector::compress_call_data`) is a pure function
//! of its arguments — nothing here changes its behavior. These constants
//! and env lookups exist purely to seed the CLI's own defaults.

/// Default `min_size` threshold below which the selector sends vanilla
/// calldata unconditionally (spec.md §4.6).
pub const DEFAULT_MIN_SIZE: usize = 800;

/// Default algorithm name passed to `compress_call_data` when the caller
/// does not specify one.
pub const DEFAULT_ALG: &str = "auto";

const ENV_MIN_SIZE: &str = "CALLDATA_COMPRESS_MIN_SIZE";
const ENV_ALG: &str = "CALLDATA_COMPRESS_ALG";
const ENV_VERBOSITY: &str = "CALLDATA_COMPRESS_VERBOSITY";

/// Notification level gating `displaylevel!` output (C9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum NotifyLevel {
    Quiet = 0,
    Info = 1,
    Verbose = 2,
}

impl Default for NotifyLevel {
    fn default() -> Self {
        NotifyLevel::Info
    }
}

impl NotifyLevel {
    fn from_str_lenient(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "0" => Some(NotifyLevel::Quiet),
            "info" | "1" => Some(NotifyLevel::Info),
            "verbose" | "2" => Some(NotifyLevel::Verbose),
            _ => None,
        }
    }
}

/// `min_size` default, overridden by `CALLDATA_COMPRESS_MIN_SIZE` if it
/// parses as a `usize`.
pub fn min_size_default() -> usize {
    std::env::var(ENV_MIN_SIZE)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MIN_SIZE)
}

/// `alg` default, overridden by `CALLDATA_COMPRESS_ALG` if set.
pub fn alg_default() -> String {
    std::env::var(ENV_ALG).unwrap_or_else(|_| DEFAULT_ALG.to_string())
}

/// Notification level default, overridden by `CALLDATA_COMPRESS_VERBOSITY`
/// if it parses as a recognised level name.
pub fn notify_level_default() -> NotifyLevel {
    std::env::var(ENV_VERBOSITY)
        .ok()
        .and_then(|v| NotifyLevel::from_str_lenient(&v))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_level_orders_quiet_below_verbose() {
        assert!(NotifyLevel::Quiet < NotifyLevel::Info);
        assert!(NotifyLevel::Info < NotifyLevel::Verbose);
    }

    #[test]
    fn notify_level_parses_known_names() {
        assert_eq!(NotifyLevel::from_str_lenient("quiet"), Some(NotifyLevel::Quiet));
        assert_eq!(NotifyLevel::from_str_lenient("VERBOSE"), Some(NotifyLevel::Verbose));
        assert_eq!(NotifyLevel::from_str_lenient("loud"), None);
    }

    #[test]
    fn defaults_match_spec_constants() {
        assert_eq!(DEFAULT_MIN_SIZE, 800);
        assert_eq!(DEFAULT_ALG, "auto");
    }
}
