//! Logging setup for arch-report.
//!
//! - stdout is reserved for the report path
//! - stderr receives all log output (human or JSON lines)

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel, LOG_ENV};

use std::io::IsTerminal;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Build the event filter.
///
/// `RUST_LOG` directives apply only when no `-v`/`-q` was given.
fn build_filter(config: &LogConfig, rust_log: Option<&str>) -> EnvFilter {
    let builder =
        EnvFilter::builder().with_default_directive(LevelFilter::from(config.level).into());
    match rust_log {
        Some(directives) if !config.level_from_cli => builder.parse_lossy(directives),
        _ => builder.parse_lossy(""),
    }
}

/// Initialize the logging subsystem.
///
/// Must be called once at startup before any logging occurs. A second call
/// is a no-op.
pub fn init_logging(config: &LogConfig) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(config, rust_log.as_deref());

    let result = match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_ansi(use_ansi)
                        .without_time(),
                )
                .try_init()
        }
        LogFormat::Jsonl => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(false),
            )
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("logging already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(level: Option<LogLevel>) -> LogConfig {
        LogConfig::resolve(None, level, None)
    }

    #[test]
    fn test_rust_log_applies_without_cli_level() {
        let filter = build_filter(&config(None), Some("debug"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_cli_level_beats_rust_log() {
        let filter = build_filter(&config(Some(LogLevel::Error)), Some("trace"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::ERROR));

        let filter = build_filter(&config(Some(LogLevel::Trace)), Some("error"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn test_default_level_without_rust_log() {
        let filter = build_filter(&config(None), None);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }
}
