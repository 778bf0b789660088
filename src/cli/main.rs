//! Background Removal Client CLI
//!
//! Command-line frontend for the workflow controller: submits one image,
//! prints the processing stats, optionally renders the comparison view and
//! saves the processed image.

use super::config::CliConfigBuilder;
use crate::{
    controller::{Phase, WorkflowController},
    pipeline::HttpRemovalService,
    services::{ComparisonRenderer, ConsolePhaseReporter, ImageIoService},
    tracing_config::{events, init_cli_tracing, spans},
    utils::ImageValidator,
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, Instrument};

/// Remove image backgrounds through a remote service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "bgremove-client")]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input image file
    #[arg(value_name = "INPUT", required_unless_present = "check")]
    pub input: Option<String>,

    /// Base URL of the removal service
    #[arg(long, env = "BGREMOVE_BACKEND_URL", value_name = "URL")]
    pub backend_url: Option<String>,

    /// Directory for the exported image [default: download directory]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Comparison slider position (0-100)
    #[arg(long, default_value_t = 50, allow_negative_numbers = true)]
    pub position: i64,

    /// Write the rendered before/after comparison to this PNG file
    #[arg(long, value_name = "FILE")]
    pub preview: Option<PathBuf>,

    /// Skip saving the processed image
    #[arg(long)]
    pub no_export: bool,

    /// Request timeout in seconds [default: wait indefinitely]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Check that the service is reachable and exit
    #[arg(long)]
    pub check: bool,

    /// Enable verbose logging (-v: DEBUG, -vv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Console)]
    pub log_format: LogFormat,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum LogFormat {
    /// Colored, human-readable lines
    Console,
    /// Plain lines without colors or timestamps, for CI logs
    Compact,
    /// JSON objects (requires the `tracing-json` feature)
    Json,
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_format = CliConfigBuilder::tracing_format(&cli)?;
    init_cli_tracing(cli.verbose, log_format).context("Failed to initialize tracing")?;

    CliConfigBuilder::validate_cli(&cli).context("Invalid CLI arguments")?;
    let config = CliConfigBuilder::from_cli(&cli).context("Failed to build configuration")?;
    debug!(?config, "Resolved configuration");

    let service =
        Arc::new(HttpRemovalService::new(&config).context("Failed to create HTTP client")?);

    if cli.check {
        return check_service(&service).await;
    }

    let input = cli
        .input
        .as_deref()
        .context("An input image is required")?;
    let validator = ImageValidator::with_max_bytes(config.max_upload_bytes);
    let file = ImageIoService::load_file(input, &validator)
        .await
        .with_context(|| format!("Failed to read {}", input))?;

    let span = spans::submission(&file.metadata.name, service.endpoint());
    let mut controller = WorkflowController::new(&config, service)
        .context("Failed to create workflow")?
        .with_reporter(Arc::new(ConsolePhaseReporter::new()));

    let phase = async {
        controller.select_file(file);
        controller.settle().await.phase()
    }
    .instrument(span)
    .await;

    if phase != Phase::Result {
        let message = controller
            .state()
            .error()
            .map_or_else(|| format!("workflow ended in {}", phase), ToString::to_string);
        anyhow::bail!("Background removal failed: {}", message);
    }

    let position = CliConfigBuilder::slider_position(&cli)?;
    if let Some(layout) = controller.move_slider(position) {
        debug!(
            position = layout.position,
            panel_width = layout.original_panel_width_percent(),
            offset = layout.original_offset_percent(),
            "Comparison layout"
        );
    }

    if let Some(preview) = &cli.preview {
        write_preview(&controller, position, preview)?;
    }

    if cli.no_export {
        info!("Export skipped");
        return Ok(());
    }

    let directory = CliConfigBuilder::output_dir(&cli);
    let _export_span = spans::export(&directory).entered();
    match controller.export_to(&directory) {
        Ok(path) => {
            events::progress(&format!("Saved {}", path.display()), "💾");
            Ok(())
        },
        Err(e) => {
            events::error_with_context(&e, "export");
            Err(e).context("Failed to save processed image")
        },
    }
}

async fn check_service(service: &HttpRemovalService) -> Result<()> {
    let message = service
        .health_check()
        .await
        .with_context(|| format!("Service at {} is not reachable", service.endpoint()))?;
    events::progress(&format!("Service is up: {}", message), "✅");
    println!("{}", message);
    Ok(())
}

fn write_preview(controller: &WorkflowController, position: u8, path: &Path) -> Result<()> {
    let _span = spans::preview(position).entered();
    let Some(result) = controller.state().result() else {
        events::warning_with_recommendation(
            "No result available for the comparison preview",
            "Run again without --preview",
        );
        return Ok(());
    };

    ComparisonRenderer::save_png(result, position, path)
        .with_context(|| format!("Failed to write preview {}", path.display()))?;
    events::progress(&format!("Comparison preview written to {}", path.display()), "🖼️");
    Ok(())
}
