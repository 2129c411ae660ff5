use std::io;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

/// Map a configured level name onto a tracing directive.
/// Accepts PANIC, FATAL, ERROR, WARN, INFO, DEBUG and TRACE, case-insensitive.
/// PANIC and FATAL have no tracing counterpart and collapse to `error`.
pub fn level_directive(level: &str) -> Option<&'static str> {
    match level.trim().to_ascii_uppercase().as_str() {
        "PANIC" | "FATAL" | "ERROR" => Some("error"),
        "WARN" | "WARNING" => Some("warn"),
        "INFO" => Some("info"),
        "DEBUG" => Some("debug"),
        "TRACE" => Some("trace"),
        _ => None,
    }
}

/// Filter for a configured level; unknown names fall back to INFO.
fn filter_for(level: &str) -> EnvFilter {
    let directive = level_directive(level).unwrap_or("info");
    EnvFilter::new(format!("{directive},sqlx=warn"))
}

/// Handle to the installed subscriber's filter.
#[derive(Clone)]
pub struct LogHandle {
    inner: Option<reload::Handle<EnvFilter, Registry>>,
    env_override: bool,
}

impl LogHandle {
    /// Swap the active level. A no-op when `RUST_LOG` pinned the filter at startup.
    pub fn set_level(&self, level: &str) {
        if self.env_override {
            return;
        }
        let Some(handle) = &self.inner else { return };
        if level_directive(level).is_none() {
            warn!(level, "invalid log level, falling back to INFO");
        }
        if let Err(e) = handle.reload(filter_for(level)) {
            warn!(error = %e, "failed to reload log filter");
        }
    }

    /// Handle for tests and tools that never installed a subscriber.
    pub fn noop() -> Self {
        Self { inner: None, env_override: false }
    }
}

/// Install the global subscriber writing to stdout.
/// - `RUST_LOG` wins over `level` when set
/// - `format` is `json` or anything else for compact text
pub fn init_logging(level: &str, format: &str) -> LogHandle {
    let from_env = EnvFilter::try_from_default_env().ok();
    let env_override = from_env.is_some();
    let initial = from_env.unwrap_or_else(|| filter_for(level));
    let (filter, handle) = reload::Layer::new(initial);
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_target(false).with_writer(io::stdout))
            .try_init()
    } else {
        registry
            .with(fmt::layer().compact().with_target(false).with_writer(io::stdout))
            .try_init()
    };

    if installed.is_err() {
        return LogHandle::noop();
    }
    if !env_override && level_directive(level).is_none() {
        warn!(level, "invalid log level, falling back to INFO");
    }
    LogHandle { inner: Some(handle), env_override }
}

/// Compact logger at INFO, used before the configuration is available.
pub fn init_logging_default() -> LogHandle {
    init_logging("INFO", "compact")
}
