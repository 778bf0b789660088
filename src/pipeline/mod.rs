//! Submission pipeline for the remote removal service
//!
//! The pipeline takes a validated [`ImageAsset`], hands it to a
//! [`RemovalService`] and turns the wire response into a
//! [`ProcessingResult`]. Transport concerns live behind the trait so the
//! workflow can run against HTTP or a scripted service in tests.

pub mod http;
pub mod mock;

use crate::{
    data_url::DataUrl,
    error::{ClientError, Result},
    types::{ImageAsset, ProcessingResult, ProcessingStats},
};
use async_trait::async_trait;
use instant::Instant;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub use http::HttpRemovalService;
pub use mock::MockRemovalService;

/// Success payload of the removal endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovalResponse {
    /// Original upload as a data URL
    pub original_image: String,
    /// Background-removed PNG as a data URL
    pub processed_image: String,
    /// Server-side processing time in seconds
    pub processing_time: f64,
    /// Upload size in bytes
    pub original_size: u64,
    /// Result size in bytes
    pub processed_size: u64,
}

impl RemovalResponse {
    /// Decode the wire payload into a result
    ///
    /// # Errors
    /// - Either image is not a valid base64 data URL
    /// - Processing time negative or not finite
    pub fn into_result(self) -> Result<ProcessingResult> {
        let original_image = DataUrl::parse(&self.original_image)?;
        let processed_image = DataUrl::parse(&self.processed_image)?;
        let stats =
            ProcessingStats::new(self.processing_time, self.original_size, self.processed_size)?;

        Ok(ProcessingResult {
            original_image,
            processed_image,
            stats,
        })
    }
}

/// Error payload the service may attach to non-success responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Map a non-success response body to an error
///
/// A string `detail` field becomes [`ClientError::Remote`] verbatim; anything
/// else is a [`ClientError::Network`] naming the status.
pub(crate) fn error_from_body(status: u16, body: &str) -> ClientError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.detail)
        .and_then(|detail| match detail {
            serde_json::Value::String(text) if !text.trim().is_empty() => Some(text),
            _ => None,
        });

    match detail {
        Some(detail) => ClientError::remote(detail),
        None => ClientError::network(format!("HTTP status {}", status)),
    }
}

/// Transport to a background removal service
#[async_trait]
pub trait RemovalService: Send + Sync {
    /// Submit one image and return the raw success payload
    ///
    /// # Errors
    ///
    /// - [`ClientError::Remote`] when the service reports a detail
    /// - [`ClientError::Network`] on transport failures or bare error statuses
    /// - [`ClientError::Decode`] when the success body is malformed
    async fn remove_background(&self, asset: &ImageAsset) -> Result<RemovalResponse>;

    /// Human-readable name for logs
    fn name(&self) -> &str;
}

/// Single-request submit/await/resolve sequence
#[derive(Clone)]
pub struct UploadPipeline {
    service: Arc<dyn RemovalService>,
}

impl std::fmt::Debug for UploadPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadPipeline")
            .field("service", &self.service.name())
            .finish()
    }
}

impl UploadPipeline {
    pub fn new(service: Arc<dyn RemovalService>) -> Self {
        Self { service }
    }

    /// Submit an asset and decode the outcome
    pub async fn submit(&self, asset: &ImageAsset) -> Result<ProcessingResult> {
        let started = Instant::now();
        info!(
            file = %asset.name(),
            mime_type = %asset.mime_type(),
            size = asset.size(),
            service = %self.service.name(),
            "Submitting image for background removal"
        );

        let response = self.service.remove_background(asset).await?;
        let result = response.into_result()?;

        if result.processed_image.mime_type() != "image/png" {
            warn!(
                mime_type = %result.processed_image.mime_type(),
                "Processed image is not reported as PNG"
            );
        }

        debug!(
            round_trip_ms = started.elapsed().as_millis() as u64,
            processing_time = result.stats.processing_time_seconds,
            processed_size = result.stats.processed_size_bytes,
            "Background removal completed"
        );

        Ok(result)
    }
}
