//! Scripted removal service for testing and offline demos
//!
//! Outcomes are queued ahead of time and handed out in order, each with an
//! optional delay so tests can make completions arrive out of order.

use super::{RemovalResponse, RemovalService};
use crate::data_url::DataUrl;
use crate::error::{ClientError, Result};
use crate::types::ImageAsset;
use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

struct ScriptedOutcome {
    delay: Option<Duration>,
    outcome: Result<RemovalResponse>,
}

/// Removal service answering from a queue of scripted outcomes
#[derive(Default)]
pub struct MockRemovalService {
    script: Mutex<VecDeque<ScriptedOutcome>>,
    call_history: Mutex<Vec<String>>,
}

impl MockRemovalService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response
    pub fn push_success(&self, response: RemovalResponse) {
        self.push(None, Ok(response));
    }

    /// Queue a failure
    pub fn push_error(&self, error: ClientError) {
        self.push(None, Err(error));
    }

    /// Queue an outcome delivered after `delay`
    pub fn push_delayed(&self, delay: Duration, outcome: Result<RemovalResponse>) {
        self.push(Some(delay), outcome);
    }

    fn push(&self, delay: Option<Duration>, outcome: Result<RemovalResponse>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(ScriptedOutcome { delay, outcome });
        }
    }

    /// Names of the assets submitted so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.call_history
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }

    /// A well-formed success payload with small real PNG images
    #[must_use]
    pub fn success_response(
        processing_time: f64,
        original_size: u64,
        processed_size: u64,
    ) -> RemovalResponse {
        let original = DataUrl::new("image/png", png_bytes(4, 2, [200, 30, 30, 255]));
        let processed = DataUrl::new("image/png", png_bytes(4, 2, [30, 200, 30, 128]));
        RemovalResponse {
            original_image: original.to_string(),
            processed_image: processed.to_string(),
            processing_time,
            original_size,
            processed_size,
        }
    }
}

/// Encode a solid-color RGBA image as PNG
#[must_use]
pub fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)));
    let mut buffer = std::io::Cursor::new(Vec::new());
    match image.write_to(&mut buffer, ImageFormat::Png) {
        Ok(()) => buffer.into_inner(),
        Err(_) => Vec::new(),
    }
}

#[async_trait]
impl RemovalService for MockRemovalService {
    async fn remove_background(&self, asset: &ImageAsset) -> Result<RemovalResponse> {
        if let Ok(mut history) = self.call_history.lock() {
            history.push(asset.name().to_string());
        }

        let next = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front());

        let Some(ScriptedOutcome { delay, outcome }) = next else {
            return Err(ClientError::network("no scripted response left"));
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        outcome
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SelectedFile;
    use crate::utils::ImageValidator;

    #[tokio::test]
    async fn test_outcomes_in_order_then_exhausted() {
        let service = MockRemovalService::new();
        service.push_error(ClientError::remote("first"));
        service.push_success(MockRemovalService::success_response(1.0, 1, 1));

        let asset = ImageValidator::new()
            .validate(SelectedFile::from_bytes("a.png", "image/png", vec![0]))
            .unwrap();

        assert!(matches!(
            service.remove_background(&asset).await,
            Err(ClientError::Remote(_))
        ));
        assert!(service.remove_background(&asset).await.is_ok());
        assert!(matches!(
            service.remove_background(&asset).await,
            Err(ClientError::Network(_))
        ));
        assert_eq!(service.calls().len(), 3);
    }

    #[test]
    fn test_png_bytes_decode() {
        let bytes = png_bytes(3, 5, [1, 2, 3, 4]);
        let image = image::load_from_memory(&bytes).unwrap();
        assert_eq!((image.width(), image.height()), (3, 5));
    }
}
