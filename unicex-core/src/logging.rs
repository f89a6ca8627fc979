//! Structured logging setup.
//!
//! The engine itself only emits `tracing` events; applications decide where
//! they go. These helpers install a `tracing-subscriber` registry with an
//! `EnvFilter` (honoring `RUST_LOG`) and a pretty, compact or JSON formatter.
//!
//! Secrets never reach the log: credentials are `SecretString`s whose `Debug`
//! is redacted, and response bodies are logged as bounded previews.

use tracing::{Level, Subscriber};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::{Error, Result};

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Wire-level detail
    Trace,
    /// Request/response summaries
    Debug,
    /// Market loads and other lifecycle events
    Info,
    /// Classified failures
    Warn,
    /// Errors
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human-readable
    Pretty,
    /// One line per event
    Compact,
    /// Newline-delimited JSON
    Json,
}

/// Log configuration.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct LogConfig {
    /// Level applied to the engine's crates when `RUST_LOG` is unset.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Prefix events with a timestamp.
    pub show_time: bool,
    /// Include thread ids.
    pub show_thread_ids: bool,
    /// Include the emitting module.
    pub show_target: bool,
    /// Log span enter/close, e.g. around each HTTP round trip.
    pub show_span_events: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            show_time: true,
            show_thread_ids: false,
            show_target: true,
            show_span_events: false,
        }
    }
}

impl LogConfig {
    /// Debug level with span events.
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            show_span_events: true,
            ..Self::default()
        }
    }

    /// JSON at info level with thread ids.
    pub fn production() -> Self {
        Self {
            format: LogFormat::Json,
            show_thread_ids: true,
            ..Self::default()
        }
    }

    /// Quiet compact output for test runs.
    pub fn test() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            show_time: false,
            show_thread_ids: false,
            show_target: false,
            show_span_events: false,
        }
    }

    /// Filter directive used when `RUST_LOG` is unset.
    pub fn directive(&self) -> String {
        format!(
            "unicex={lvl},unicex_core={lvl},unicex_exchanges={lvl}",
            lvl = self.level
        )
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directive()))
    }

    fn fmt_layer<S>(&self) -> Box<dyn Layer<S> + Send + Sync>
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        let span_events = if self.show_span_events {
            FmtSpan::ENTER | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let base = fmt::layer()
            .with_thread_ids(self.show_thread_ids)
            .with_target(self.show_target)
            .with_span_events(span_events);

        match (self.format, self.show_time) {
            (LogFormat::Pretty, true) => base.pretty().boxed(),
            (LogFormat::Pretty, false) => base.pretty().without_time().boxed(),
            (LogFormat::Compact, true) => base.compact().boxed(),
            (LogFormat::Compact, false) => base.compact().without_time().boxed(),
            (LogFormat::Json, true) => base.json().boxed(),
            (LogFormat::Json, false) => base.json().without_time().boxed(),
        }
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails with `InternalError` if a global subscriber is already set.
///
/// ```no_run
/// use unicex_core::logging::{init_logging, LogConfig};
///
/// init_logging(&LogConfig::development()).unwrap();
/// ```
pub fn init_logging(config: &LogConfig) -> Result<()> {
    tracing_subscriber::registry()
        .with(config.fmt_layer().with_filter(config.env_filter()))
        .try_init()
        .map_err(|e| Error::internal(format!("Failed to install log subscriber: {e}")))
}

/// Like [`init_logging`], but a second call is a no-op. Handy in tests.
pub fn try_init_logging(config: &LogConfig) {
    let _ = init_logging(config);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
        assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
        assert_eq!(LogLevel::Debug.to_string(), "debug");
    }

    #[test]
    fn test_presets() {
        assert_eq!(LogConfig::development().level, LogLevel::Debug);
        assert!(LogConfig::development().show_span_events);
        assert_eq!(LogConfig::production().format, LogFormat::Json);
        assert!(!LogConfig::test().show_time);
    }

    #[test]
    fn test_directive_covers_all_crates() {
        let directive = LogConfig::test().directive();
        assert!(directive.contains("unicex_core=warn"));
        assert!(directive.contains("unicex_exchanges=warn"));
    }

    #[test]
    fn test_try_init_logging_twice() {
        try_init_logging(&LogConfig::test());
        try_init_logging(&LogConfig::test());
    }
}
