#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unused_async)]

//! # Background Removal Client
//!
//! Client side of a remote background removal service. A user picks an image,
//! the client validates it, uploads it, and shows the original and the
//! processed result side by side behind a draggable divider. The processed
//! image can then be saved locally.
//!
//! ## Features
//!
//! - **Validation**: only `image/*` files under 20 MiB are ever uploaded
//! - **Upload Pipeline**: multipart submission with typed error mapping
//! - **Workflow State Machine**: a pure transition function plus a controller
//!   that discards stale completions
//! - **Comparison Geometry**: exact layout of the before/after split view
//! - **Export**: atomic PNG save under a fixed file name
//! - **CLI Integration**: optional command-line interface (enable with `cli` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bgremove_client::{remove_background_from_file, ClientConfig, StatsFormatter};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::builder()
//!     .backend_base_url("http://localhost:8001")
//!     .build()?;
//!
//! let result = remove_background_from_file("portrait.jpg", &config).await?;
//! let stats = StatsFormatter::format(&result.stats);
//! println!("took {}, {} -> {}", stats.processing_time, stats.original_size, stats.processed_size);
//! # Ok(())
//! # }
//! ```
//!
//! ## Driving the workflow
//!
//! ```rust,no_run
//! use bgremove_client::{
//!     ClientConfig, HttpRemovalService, ImageIoService, ImageValidator, Phase, WorkflowController,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::from_env()?;
//! let service = Arc::new(HttpRemovalService::new(&config)?);
//! let mut controller = WorkflowController::new(&config, service)?;
//!
//! let validator = ImageValidator::with_max_bytes(config.max_upload_bytes);
//! controller.select_file(ImageIoService::load_file("portrait.jpg", &validator).await?);
//! if controller.settle().await.phase() == Phase::Result {
//!     let layout = controller.move_slider(30);
//!     println!("{:?}", layout);
//!     controller.export_to(std::path::Path::new("."))?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Feature Flags
//!
//! - `cli` (default): Command-line interface and progress reporting (optional for library usage)
//! - `webp-support` (default): WebP decoding for previews and export conversion
//! - `tracing-json`: JSON structured log output for the CLI

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod controller;
pub mod data_url;
pub mod error;
pub mod export;
pub mod geometry;
pub mod pipeline;
pub mod services;
#[cfg(feature = "cli")]
pub mod tracing_config;
pub mod types;
pub mod utils;

use std::path::Path;
use std::sync::Arc;

// Public API exports
pub use config::{ClientConfig, ClientConfigBuilder};
pub use controller::{
    transition, Command, Phase, TransitionRules, UiState, WorkflowController, WorkflowEvent,
};
pub use data_url::DataUrl;
pub use error::{ClientError, OperationError, Result};
pub use export::ExportAction;
pub use geometry::{layout, ComparisonLayout, OriginalPanel};
pub use pipeline::{
    HttpRemovalService, MockRemovalService, RemovalResponse, RemovalService, UploadPipeline,
};
#[cfg(feature = "cli")]
pub use services::ConsolePhaseReporter;
pub use services::{
    ComparisonRenderer, FormattedStats, ImageIoService, NoOpPhaseReporter, PhaseReporter,
    StatsFormatter,
};
pub use types::{FileMetadata, ImageAsset, ProcessingResult, ProcessingStats, SelectedFile};
pub use utils::{ImageValidator, NumericValidator, MAX_UPLOAD_BYTES};

#[cfg(feature = "cli")]
pub use tracing_config::{events, init_cli_tracing, spans, TracingConfig, TracingFormat};

/// Remove the background of a local image file in one call
///
/// Loads the file, validates it with the configured limits and submits it to
/// the configured backend. No workflow state is kept.
///
/// # Errors
/// - [`ClientError::Io`] if the file cannot be read
/// - [`ClientError::InvalidFileType`] / [`ClientError::FileTooLarge`] for rejected files
/// - Any error reported by the backend
pub async fn remove_background_from_file<P: AsRef<Path>>(
    path: P,
    config: &ClientConfig,
) -> Result<ProcessingResult> {
    let validator = ImageValidator::with_max_bytes(config.max_upload_bytes);
    let file = ImageIoService::load_file(path, &validator).await?;
    let asset = validator.validate(file)?;
    let service = Arc::new(HttpRemovalService::new(config)?);
    UploadPipeline::new(service).submit(&asset).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let err = remove_background_from_file("/definitely/not/here.png", &ClientConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Io(_)));
    }

    #[tokio::test]
    async fn test_text_file_rejected_before_upload() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"plain text").unwrap();

        // Unroutable backend: reaching the network would yield a Network error instead.
        let config = ClientConfig::builder()
            .backend_base_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        let err = remove_background_from_file(&path, &config).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidFileType { .. }));
    }
}
