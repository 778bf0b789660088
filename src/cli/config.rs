//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::{Cli, LogFormat};
use crate::{
    config::ClientConfig, export::ExportAction, tracing_config::TracingFormat,
    utils::NumericValidator,
};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Convert CLI arguments to a validated [`ClientConfig`]
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build ClientConfig from CLI arguments
    ///
    /// `--position` is not part of the config: the workflow starts every result
    /// at the configured default and the CLI moves the slider afterwards.
    pub(crate) fn from_cli(cli: &Cli) -> Result<ClientConfig> {
        let mut builder = ClientConfig::builder();
        if let Some(url) = &cli.backend_url {
            builder = builder.backend_base_url(url.clone());
        }
        if let Some(secs) = cli.timeout {
            builder = builder.request_timeout(Some(Duration::from_secs(secs)));
        }

        builder.build().context("Invalid configuration")
    }

    /// Slider position requested on the command line
    pub(crate) fn slider_position(cli: &Cli) -> Result<u8> {
        NumericValidator::validate_slider_position(cli.position).context("Invalid --position")
    }

    /// Export directory, defaulting to the user's download directory
    pub(crate) fn output_dir(cli: &Cli) -> PathBuf {
        cli.output
            .clone()
            .unwrap_or_else(ExportAction::default_directory)
    }

    /// Map the `--log-format` choice to a subscriber format
    pub(crate) fn tracing_format(cli: &Cli) -> Result<TracingFormat> {
        match cli.log_format {
            LogFormat::Console => Ok(TracingFormat::Console),
            LogFormat::Compact => Ok(TracingFormat::Compact),
            #[cfg(feature = "tracing-json")]
            LogFormat::Json => Ok(TracingFormat::Json),
            #[cfg(not(feature = "tracing-json"))]
            LogFormat::Json => {
                anyhow::bail!("JSON logs are not available; rebuild with --features tracing-json")
            },
        }
    }

    /// Validate CLI arguments for consistency
    pub(crate) fn validate_cli(cli: &Cli) -> Result<()> {
        Self::slider_position(cli)?;

        if !cli.check && cli.input.is_none() {
            anyhow::bail!("An input image is required");
        }

        if cli.timeout == Some(0) {
            anyhow::bail!("--timeout must be at least 1 second");
        }

        let output = Self::output_dir(cli);
        if !cli.no_export && output.exists() && !output.is_dir() {
            anyhow::bail!("Output '{}' is not a directory", output.display());
        }

        Ok(())
    }
}
