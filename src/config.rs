//! Runtime configuration — all environment variables in one place.
//!
//! The configuration is read once at startup into an owned [`Config`] value
//! and passed down explicitly; nothing in the crate consults the environment
//! after that.

use std::time::Duration;

use tracing_subscriber::EnvFilter;

/// Directory holding the real Nix binaries, baked in at build time.
///
/// Prepended to `PATH` before anything is spawned, so exec of an unmodified
/// invocation resolves to the wrapped tool instead of back into this
/// interceptor.
pub const TOOL_PATH: Option<&str> = option_env!("NIX_MONITORED_PATH");

/// Icon handed to the notification agent.
pub const NOTIFY_ICON: &str = match option_env!("NIX_MONITORED_ICON") {
    Some(icon) => icon,
    None => "nix-snowflake",
};

/// Grace period before a finished command is worth a notification.
const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(2);

/// How the `NIX_MONITOR` variable gates the interceptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorMode {
    /// Monitor when the usual gates allow it (default).
    #[default]
    Auto,
    /// Always defer to the wrapped tool untouched.
    Disable,
    /// Monitor even when the gates say otherwise.
    Force,
}

/// Configuration snapshot taken once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// `NIX_DEBUG` set: debug-level logging.
    pub debug: bool,
    /// `NIX_MONITOR`: disable or force the interceptor.
    pub monitor: MonitorMode,
    /// `NIX_NOTIFY`: whether the notifier may run at all.
    pub notify: bool,
    /// `NIX_NOTIFY_TIMEOUT` in milliseconds; `None` disables notifications.
    pub notify_timeout: Option<Duration>,
}

impl Config {
    /// Read the configuration from the environment.
    pub fn from_env() -> Self {
        Self {
            debug: std::env::var_os("NIX_DEBUG").is_some(),
            monitor: monitor_mode_from(std::env::var("NIX_MONITOR").ok().as_deref()),
            notify: notify_enabled_from(std::env::var("NIX_NOTIFY").ok().as_deref()),
            notify_timeout: notify_timeout_from(
                std::env::var("NIX_NOTIFY_TIMEOUT").ok().as_deref(),
            ),
        }
    }
}

fn monitor_mode_from(value: Option<&str>) -> MonitorMode {
    match value {
        Some("disable") => MonitorMode::Disable,
        Some("force") => MonitorMode::Force,
        _ => MonitorMode::Auto,
    }
}

fn notify_enabled_from(value: Option<&str>) -> bool {
    !matches!(value, Some("0") | Some("false") | Some("disable"))
}

/// Millisecond threshold from the environment. A negative value disables
/// notifications entirely; unparseable input keeps the default.
fn notify_timeout_from(value: Option<&str>) -> Option<Duration> {
    let Some(raw) = value else {
        return Some(DEFAULT_NOTIFY_TIMEOUT);
    };
    match raw.trim().parse::<i64>() {
        Ok(ms) if ms < 0 => None,
        Ok(ms) => Some(Duration::from_millis(ms as u64)),
        Err(_) => Some(DEFAULT_NOTIFY_TIMEOUT),
    }
}

/// The search path exported to every child: the compile-time tool directory
/// in front of whatever the caller already had.
pub fn search_path(current: &str) -> String {
    match TOOL_PATH {
        Some(prefix) if current.is_empty() => prefix.to_string(),
        Some(prefix) => format!("{prefix}:{current}"),
        None => current.to_string(),
    }
}

/// Initialize tracing once. Output goes to stderr without timestamps so the
/// interceptor reads like the tool it wraps; `RUST_LOG` overrides the
/// default filter.
pub fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
