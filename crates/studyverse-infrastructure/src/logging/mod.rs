//! Logging setup.
//!
//! - One-line JSON records in a daily rolling file under the log directory
//! - Human-readable colored output on stderr in debug builds
//! - `log` records (used by the domain crate) forwarded into `tracing`
//!
//! `RUST_LOG` overrides the configured level.

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_log::LogTracer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

static LOG_DIR: OnceLock<PathBuf> = OnceLock::new();
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_FILE_PREFIX: &str = "studyverse.log";

/// stdout carries command output, so console logs go to stderr
const CONSOLE_WRITER: fn() -> io::Stderr = io::stderr;

/// Log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Default directive: the given level for our crates, warn for the rest
    fn directive(&self) -> String {
        format!(
            "warn,studyverse={lvl},studyverse_app={lvl},studyverse_domain={lvl},studyverse_infrastructure={lvl}",
            lvl = self.as_str()
        )
    }
}

/// Initialize the global subscriber. Calling it again is a no-op.
pub fn init_logger(log_dir: &Path, level: LogLevel) -> anyhow::Result<()> {
    if FILE_GUARD.get().is_some() {
        return Ok(());
    }

    std::fs::create_dir_all(log_dir)?;
    let _ = LOG_DIR.set(log_dir.to_path_buf());

    // Forward `log` records into tracing
    let _ = LogTracer::builder()
        .with_max_level(LevelFilter::Trace)
        .init();

    let file_appender = rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let json_layer = fmt::layer()
        .with_writer(non_blocking)
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_span_list(false)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_timer(fmt::time::ChronoLocal::new(
            "%Y-%m-%dT%H:%M:%S%.3f%:z".to_string(),
        ))
        .with_filter(build_filter(level));

    let stderr_layer = if cfg!(debug_assertions) {
        Some(console_layer(level, CONSOLE_WRITER, true))
    } else {
        None
    };

    let subscriber = Registry::default().with(json_layer).with(stderr_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    let _ = FILE_GUARD.set(guard);

    tracing::info!(
        target: "studyverse::logging",
        log_dir = %log_dir.display(),
        level = level.as_str(),
        version = env!("CARGO_PKG_VERSION"),
        profile = if cfg!(debug_assertions) { "Debug" } else { "Release" },
        "Logger initialized"
    );

    Ok(())
}

/// Human-readable log lines for a terminal
fn console_layer<S, W>(level: LogLevel, writer: W, ansi: bool) -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_ansi(ansi)
        .with_timer(fmt::time::ChronoLocal::new(
            "%Y-%m-%d %H:%M:%S%.3f".to_string(),
        ))
        .with_filter(build_filter(level))
}

fn build_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.directive()))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Get log directory path, once the logger is initialized
pub fn get_log_dir() -> Option<PathBuf> {
    LOG_DIR.get().cloned()
}
