//! Log subscriber setup for the command-line client
//!
//! The library only emits `tracing` events and spans. Installing a subscriber
//! is left to the binary, which picks the output format from `--log-format`
//! and the level from `-v` (or `RUST_LOG`).

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Target prefix of every event this crate emits
const CRATE_TARGET: &str = "bgremove_client";

/// How log lines are rendered on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TracingFormat {
    /// Colored lines with timestamps
    #[default]
    Console,
    /// Uncolored lines without timestamps, for CI logs and pipes
    Compact,
    /// One JSON object per event, including the active span chain
    #[cfg(feature = "tracing-json")]
    Json,
}

/// Subscriber settings collected from the command line
#[derive(Debug, Default)]
pub struct TracingConfig {
    /// Number of `-v` flags
    pub verbosity: u8,
    pub format: TracingFormat,
    /// Explicit filter directives, replacing the verbosity mapping
    pub env_filter: Option<String>,
    /// Logged once at startup so a run's lines can be grouped
    pub session_id: Option<String>,
}

impl TracingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_env_filter<S: Into<String>>(mut self, filter: S) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    pub fn with_session_id<S: Into<String>>(mut self, session_id: S) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Filter directives for the configured verbosity
    ///
    /// The client's own events are one level chattier than its dependencies,
    /// so `-v` shows request details without the HTTP stack's internals.
    pub fn filter_directives(&self) -> String {
        let (deps, own) = match self.verbosity {
            0 => ("warn", "info"),
            1 => ("info", "debug"),
            _ => ("debug", "trace"),
        };
        format!("{deps},{CRATE_TARGET}={own}")
    }

    fn build_filter(&self) -> anyhow::Result<EnvFilter> {
        let directives = match &self.env_filter {
            Some(custom) => custom.clone(),
            None => self.filter_directives(),
        };
        Ok(EnvFilter::try_new(directives)?)
    }

    fn output_layer<S>(&self) -> Box<dyn Layer<S> + Send + Sync>
    where
        S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        let base = fmt::layer().with_writer(std::io::stderr).with_target(false);
        match self.format {
            TracingFormat::Console => base.with_ansi(true).compact().boxed(),
            TracingFormat::Compact => base.with_ansi(false).without_time().compact().boxed(),
            #[cfg(feature = "tracing-json")]
            TracingFormat::Json => base
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .boxed(),
        }
    }

    /// Install the global subscriber
    ///
    /// Fails if a subscriber is already set or the filter does not parse.
    pub fn init(self) -> anyhow::Result<()> {
        let filter = self.build_filter()?;

        Registry::default()
            .with(self.output_layer::<Registry>())
            .with(filter)
            .try_init()?;

        if let Some(session_id) = &self.session_id {
            tracing::debug!(session_id = %session_id, format = ?self.format, "Client session started");
        }

        Ok(())
    }
}

/// Install the CLI subscriber
///
/// `RUST_LOG` takes precedence over the verbosity flag when set.
pub fn init_cli_tracing(verbosity: u8, format: TracingFormat) -> anyhow::Result<()> {
    let mut config = TracingConfig::new()
        .with_verbosity(verbosity)
        .with_format(format)
        .with_session_id(uuid::Uuid::new_v4().to_string());

    if let Some(filter) = std::env::var("RUST_LOG")
        .ok()
        .filter(|f| !f.trim().is_empty())
    {
        config = config.with_env_filter(filter);
    }

    config.init()
}

/// Span creation helpers for common operations
pub mod spans {
    use tracing::{Level, Span};

    /// Span covering one file from intake to a settled phase
    pub fn submission(file_name: &str, backend: &str) -> Span {
        tracing::span!(
            Level::INFO,
            "submission",
            file_name = %file_name,
            backend = %backend
        )
    }

    /// Span for saving the processed image
    pub fn export(destination: &std::path::Path) -> Span {
        tracing::span!(
            Level::INFO,
            "export",
            destination = %destination.display()
        )
    }

    pub fn preview(position: u8) -> Span {
        tracing::span!(Level::DEBUG, "preview", position = %position)
    }
}

/// Event helpers for common logging patterns
pub mod events {
    use tracing::{error, info, warn};

    /// Log a user-facing progress line
    pub fn progress(message: &str, emoji: &str) {
        info!("{} {}", emoji, message);
    }

    pub fn error_with_context(error: &dyn std::error::Error, context: &str) {
        error!(error = %error, context = %context, "Operation failed");
    }

    pub fn warning_with_recommendation(message: &str, recommendation: &str) {
        warn!(message = %message, recommendation = %recommendation, "Warning");
    }
}
