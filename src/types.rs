//! Core data types shared by the intake, pipeline and workflow modules

use crate::data_url::DataUrl;
use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Metadata describing a file chosen by the user, before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// File name as presented to the service
    pub name: String,
    /// Declared MIME type (e.g. `image/png`)
    pub mime_type: String,
    /// Declared size in bytes
    pub size: u64,
}

impl FileMetadata {
    pub fn new<N: Into<String>, M: Into<String>>(name: N, mime_type: M, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }
}

/// A file selected or dropped by the user: metadata plus content
#[derive(Clone)]
pub struct SelectedFile {
    pub metadata: FileMetadata,
    pub content: Vec<u8>,
}

impl SelectedFile {
    /// Build from raw content; the declared size is the content length
    pub fn from_bytes<N: Into<String>, M: Into<String>>(
        name: N,
        mime_type: M,
        content: Vec<u8>,
    ) -> Self {
        let metadata = FileMetadata::new(name, mime_type, content.len() as u64);
        Self { metadata, content }
    }
}

impl std::fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedFile")
            .field("metadata", &self.metadata)
            .field("content_len", &self.content.len())
            .finish()
    }
}

/// Accepted image ready for submission. Immutable once created.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageAsset {
    name: String,
    mime_type: String,
    size: u64,
    content: Arc<[u8]>,
}

impl ImageAsset {
    /// Only the validator creates assets, so every asset has passed intake rules.
    pub(crate) fn new(metadata: FileMetadata, content: Vec<u8>) -> Self {
        Self {
            name: metadata.name,
            mime_type: metadata.mime_type,
            size: metadata.size,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

impl std::fmt::Debug for ImageAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageAsset")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Timing and size figures reported by the service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub processing_time_seconds: f64,
    pub original_size_bytes: u64,
    pub processed_size_bytes: u64,
}

impl ProcessingStats {
    /// Create stats, rejecting negative or non-finite processing times
    pub fn new(
        processing_time_seconds: f64,
        original_size_bytes: u64,
        processed_size_bytes: u64,
    ) -> Result<Self> {
        if !processing_time_seconds.is_finite() || processing_time_seconds < 0.0 {
            return Err(ClientError::decode(format!(
                "processing time must be a non-negative number, got {}",
                processing_time_seconds
            )));
        }

        Ok(Self {
            processing_time_seconds,
            original_size_bytes,
            processed_size_bytes,
        })
    }

    /// Processed size relative to the original (1.0 = unchanged)
    #[must_use]
    pub fn size_ratio(&self) -> Option<f64> {
        if self.original_size_bytes == 0 {
            None
        } else {
            Some(self.processed_size_bytes as f64 / self.original_size_bytes as f64)
        }
    }
}

/// Outcome of a successful submission: both images and their stats
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingResult {
    pub original_image: DataUrl,
    pub processed_image: DataUrl,
    pub stats: ProcessingStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_reject_negative_time() {
        assert!(ProcessingStats::new(-0.1, 1, 1).is_err());
        assert!(ProcessingStats::new(f64::NAN, 1, 1).is_err());
        assert!(ProcessingStats::new(f64::INFINITY, 1, 1).is_err());
        assert!(ProcessingStats::new(0.0, 0, 0).is_ok());
    }

    #[test]
    fn test_size_ratio() {
        let stats = ProcessingStats::new(1.0, 2_000_000, 500_000).unwrap();
        assert_eq!(stats.size_ratio(), Some(0.25));
        assert_eq!(ProcessingStats::new(1.0, 0, 10).unwrap().size_ratio(), None);
    }

    #[test]
    fn test_selected_file_size_from_content() {
        let file = SelectedFile::from_bytes("cat.png", "image/png", vec![0; 42]);
        assert_eq!(file.metadata.size, 42);
        assert_eq!(file.metadata.name, "cat.png");
    }

    #[test]
    fn test_asset_debug_omits_content() {
        let asset = ImageAsset::new(FileMetadata::new("a.png", "image/png", 3), vec![1, 2, 3]);
        let debug = format!("{:?}", asset);
        assert!(debug.contains("a.png"));
        assert!(!debug.contains("[1, 2, 3]"));
    }
}
