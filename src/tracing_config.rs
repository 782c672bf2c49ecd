//! Tracing configuration module for structured logging and observability
//!
//! The library only emits events. Binaries pick a subscriber here.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Configuration for tracing output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable console output with colors (default for CLI)
    Console,
    /// Compact console output for CI environments
    Compact,
    /// JSON structured logging
    #[cfg(feature = "tracing-json")]
    Json,
}

/// Tracing configuration builder
#[derive(Debug)]
pub struct TracingConfig {
    /// Verbosity level (maps to log levels)
    pub verbosity: u8,
    /// Output format
    pub format: TracingFormat,
    /// Environment filter string (overrides verbosity if set)
    pub env_filter: Option<String>,
    /// Session ID for correlating one editing run
    pub session_id: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            verbosity: 0,
            format: TracingFormat::Console,
            env_filter: None,
            session_id: None,
        }
    }
}

impl TracingConfig {
    /// Create a new tracing configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity level (0-2+)
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set output format
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Set custom environment filter
    pub fn with_env_filter<S: Into<String>>(mut self, filter: S) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Set session ID for correlation
    pub fn with_session_id<S: Into<String>>(mut self, session_id: S) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Convert verbosity level to tracing filter string
    pub fn verbosity_to_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "info",  // session lifecycle only
            1 => "debug", // -v: gestures, background changes, timings
            _ => "trace", // -vv: every pointer sample and commit
        }
    }

    /// Initialize the global subscriber
    pub fn init(self) -> anyhow::Result<()> {
        use tracing_subscriber::fmt;

        let filter = match &self.env_filter {
            Some(env_filter) => EnvFilter::try_new(env_filter)?,
            None => EnvFilter::try_new(self.verbosity_to_filter())?,
        };
        let registry = Registry::default().with(filter);

        match self.format {
            TracingFormat::Console => {
                let fmt_layer = fmt::layer()
                    .with_ansi(true)
                    .with_target(false)
                    .with_level(true)
                    .compact();
                registry.with(fmt_layer).try_init()?;
            },
            TracingFormat::Compact => {
                let fmt_layer = fmt::layer().with_ansi(false).with_target(false).compact();
                registry.with(fmt_layer).try_init()?;
            },
            #[cfg(feature = "tracing-json")]
            TracingFormat::Json => {
                let fmt_layer = fmt::layer().json().with_current_span(true).with_span_list(true);
                registry.with(fmt_layer).try_init()?;
            },
        }

        if let Some(session_id) = &self.session_id {
            tracing::debug!(session_id = %session_id, "Mask editing run started");
        }

        Ok(())
    }
}

/// Initialize tracing with CLI-friendly defaults and a fresh session id
pub fn init_cli_tracing(verbosity: u8, json: bool) -> anyhow::Result<String> {
    let session_id = uuid::Uuid::new_v4().to_string();

    #[cfg(feature = "tracing-json")]
    let format = if json { TracingFormat::Json } else { TracingFormat::Console };
    #[cfg(not(feature = "tracing-json"))]
    let format = {
        if json {
            eprintln!("JSON logging requires the tracing-json feature, using console output");
        }
        TracingFormat::Console
    };

    TracingConfig::new()
        .with_verbosity(verbosity)
        .with_format(format)
        .with_session_id(session_id.clone())
        .init()?;
    Ok(session_id)
}

/// Span creation helpers for the editing workflow
pub mod spans {
    use tracing::{Level, Span};

    /// Span covering one whole editing run
    pub fn session(session_id: &str, dimensions: (u32, u32)) -> Span {
        tracing::span!(
            Level::INFO,
            "session",
            session_id = %session_id,
            width = %dimensions.0,
            height = %dimensions.1
        )
    }

    /// Span for loading the session inputs
    pub fn input_loading(original: &std::path::Path, cutout: &std::path::Path) -> Span {
        tracing::span!(
            Level::DEBUG,
            "input_loading",
            original = %original.display(),
            cutout = %cutout.display()
        )
    }

    /// Span for replaying one scripted stroke
    pub fn stroke_replay(index: usize, mode: &str, points: usize) -> Span {
        tracing::span!(
            Level::DEBUG,
            "stroke_replay",
            index = %index,
            mode = %mode,
            points = %points
        )
    }

    /// Span for writing an output artifact
    pub fn output(kind: &str, path: &std::path::Path) -> Span {
        tracing::span!(
            Level::DEBUG,
            "output",
            kind = %kind,
            path = %path.display()
        )
    }
}

/// Event helpers for common logging patterns
pub mod events {
    use tracing::{debug, error, info, warn};

    /// Log a user-facing progress update
    pub fn progress(message: &str) {
        info!("{}", message);
    }

    /// Log an error with context
    pub fn error_with_context(error: &dyn std::error::Error, context: &str) {
        error!(error = %error, context = %context, "Operation failed");
    }

    /// Log a warning with recommendation
    pub fn warning_with_recommendation(message: &str, recommendation: &str) {
        warn!(message = %message, recommendation = %recommendation, "Warning");
    }

    /// Log how long an operation took
    pub fn performance_metric(operation: &str, duration_ms: u64) {
        debug!(operation = %operation, duration_ms = %duration_ms, "Performance metric");
    }
}
