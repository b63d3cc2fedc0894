//! Logging setup and the per-component logging handle.
//!
//! [`Logging`] owns the subscriber's flush guard and must outlive the
//! orchestrator. Components never reach for a global logger: each one is
//! handed a [`Logger`] at construction and attaches its events to that span.

use crate::error::{FlowRunError, Result};
use std::str::FromStr;
use tracing::{info_span, Span};
use tracing_appender::non_blocking::WorkerGuard;

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = FlowRunError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(FlowRunError::system(format!(
                "Unknown log format '{}', expected json, pretty or compact",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default level for this crate when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
    /// Include thread ids, file and line numbers
    pub verbose_metadata: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
            verbose_metadata: false,
        }
    }
}

/// Initialised logging pipeline. Dropping or flushing it drains buffered lines.
pub struct Logging {
    guard: WorkerGuard,
    root: Logger,
}

impl Logging {
    /// Install the subscriber. Fails if another subscriber is already set.
    pub fn init(config: &LoggingConfig) -> Result<Self> {
        use tracing_subscriber::{
            fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
        };

        let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());

        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("flowrun={},sqlx=warn", config.level))
        });

        let fmt_layer = match config.format {
            LogFormat::Json => fmt::layer()
                .json()
                .with_writer(writer)
                .with_target(true)
                .with_current_span(true)
                .with_thread_ids(config.verbose_metadata)
                .with_file(config.verbose_metadata)
                .with_line_number(config.verbose_metadata)
                .boxed(),
            LogFormat::Compact => fmt::layer()
                .compact()
                .with_writer(writer)
                .with_target(false)
                .boxed(),
            LogFormat::Pretty => fmt::layer()
                .pretty()
                .with_writer(writer)
                .with_target(true)
                .with_thread_ids(config.verbose_metadata)
                .with_file(config.verbose_metadata)
                .with_line_number(config.verbose_metadata)
                .boxed(),
        };

        tracing_subscriber::registry()
            .with(fmt_layer)
            .with(env_filter)
            .try_init()
            .map_err(|e| FlowRunError::system(format!("Failed to initialise logging: {}", e)))?;

        Ok(Self {
            guard,
            root: Logger::root(),
        })
    }

    /// Root handle from which component loggers are derived
    pub fn logger(&self) -> Logger {
        self.root.clone()
    }

    /// Flush buffered output and tear down the writer thread
    pub fn flush(self) {
        drop(self.guard);
    }
}

/// Logging handle passed to components at construction.
#[derive(Debug, Clone)]
pub struct Logger {
    span: Span,
}

impl Logger {
    pub fn root() -> Self {
        Self {
            span: info_span!("flowrun"),
        }
    }

    /// A handle that attaches events to no span, for tests and tools
    pub fn disabled() -> Self {
        Self { span: Span::none() }
    }

    /// Derive the handle for a named component
    pub fn component(&self, name: &str) -> Self {
        Self {
            span: info_span!(parent: &self.span, "component", name = %name),
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::disabled()
    }
}
