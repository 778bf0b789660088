//! Saving the processed image
//!
//! Writes go to a temporary file in the target directory and are renamed into
//! place, so a failed save never leaves a truncated file behind. Output is
//! always PNG; other formats are re-encoded.

use crate::config::DEFAULT_EXPORT_FILE_NAME;
use crate::data_url::DataUrl;
use crate::error::{ClientError, Result};
use image::ImageFormat;
use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Client-side save of the processed image under a fixed name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportAction {
    file_name: String,
}

impl Default for ExportAction {
    fn default() -> Self {
        Self::new(DEFAULT_EXPORT_FILE_NAME)
    }
}

impl ExportAction {
    pub fn new<S: Into<String>>(file_name: S) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The user's download directory, or the working directory
    #[must_use]
    pub fn default_directory() -> PathBuf {
        dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Save `processed` into `directory` and return the written path
    ///
    /// # Errors
    /// - [`ClientError::Export`] if the directory is missing, the image
    ///   cannot be converted to PNG, or writing fails
    pub fn save(&self, processed: &DataUrl, directory: &Path) -> Result<PathBuf> {
        if !directory.is_dir() {
            return Err(ClientError::export(format!(
                "'{}' is not a directory",
                directory.display()
            )));
        }

        let png = Self::as_png(processed)?;
        let target = directory.join(&self.file_name);

        let mut staging = NamedTempFile::new_in(directory)
            .map_err(|e| ClientError::export(format!("create temporary file: {}", e)))?;
        staging
            .write_all(&png)
            .and_then(|()| staging.flush())
            .map_err(|e| ClientError::export(format!("write image data: {}", e)))?;
        staging.persist(&target).map_err(|e| {
            ClientError::export(format!("move into '{}': {}", target.display(), e.error))
        })?;

        info!(path = %target.display(), bytes = png.len(), "Saved processed image");
        Ok(target)
    }

    fn as_png(processed: &DataUrl) -> Result<Cow<'_, [u8]>> {
        if matches!(image::guess_format(processed.bytes()), Ok(ImageFormat::Png)) {
            return Ok(Cow::Borrowed(processed.bytes()));
        }

        debug!(mime_type = %processed.mime_type(), "Re-encoding processed image as PNG");
        let image = processed
            .decode_image()
            .map_err(|e| ClientError::export(e.to_string()))?;
        let mut buffer = std::io::Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| ClientError::export(format!("encode PNG: {}", e)))?;
        Ok(Cow::Owned(buffer.into_inner()))
    }
}
