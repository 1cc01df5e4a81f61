//! Tracing subscriber setup for the binary.
//!
//! - Filter: `ALPHADASH_LOG`, else `RUST_LOG`, else `info`.
//! - Format: `ALPHADASH_LOG_FORMAT=json` for one JSON object per line, plain otherwise.

use shared_utils::env::get_env_var_opt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Plain,
    Json,
}

/// Installs the global subscriber. A second call is a no-op.
pub fn init() {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false);

    let result = match log_format() {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Plain => builder.try_init(),
    };

    // already installed, e.g. by a test harness
    let _ = result;
}

fn filter_directive() -> String {
    get_env_var_opt("ALPHADASH_LOG")
        .or_else(|| get_env_var_opt("RUST_LOG"))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_new(filter_directive()).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn log_format() -> LogFormat {
    match get_env_var_opt("ALPHADASH_LOG_FORMAT").as_deref() {
        Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
        _ => LogFormat::Plain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear() {
        unsafe {
            std::env::remove_var("ALPHADASH_LOG");
            std::env::remove_var("RUST_LOG");
            std::env::remove_var("ALPHADASH_LOG_FORMAT");
        }
    }

    #[test]
    #[serial]
    fn filter_prefers_dashboard_variable() {
        clear();
        assert_eq!(filter_directive(), "info");
        unsafe { std::env::set_var("RUST_LOG", "warn") };
        assert_eq!(filter_directive(), "warn");
        unsafe { std::env::set_var("ALPHADASH_LOG", "alphadash=debug") };
        assert_eq!(filter_directive(), "alphadash=debug");
        clear();
    }

    #[test]
    #[serial]
    fn format_defaults_to_plain() {
        clear();
        assert_eq!(log_format(), LogFormat::Plain);
        unsafe { std::env::set_var("ALPHADASH_LOG_FORMAT", "JSON") };
        assert_eq!(log_format(), LogFormat::Json);
        clear();
    }
}
