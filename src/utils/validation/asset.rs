//! Intake validation for user-selected images
//!
//! Rules are applied in a fixed order: the MIME type check runs first, so a
//! non-image that is also oversized reports `InvalidFileType`.

use crate::error::{ClientError, Result};
use crate::types::{FileMetadata, ImageAsset, SelectedFile};

/// Largest accepted upload: 20 MiB
pub const MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

/// Accepted MIME type prefix
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// Validator turning selected files into submit-ready assets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageValidator {
    max_bytes: u64,
}

impl Default for ImageValidator {
    fn default() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl ImageValidator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator with a custom size limit
    #[must_use]
    pub fn with_max_bytes(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    #[must_use]
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Check metadata against the intake rules without touching content
    ///
    /// # Errors
    /// - `InvalidFileType` if the MIME type does not start with `image/`
    /// - `FileTooLarge` if the declared size exceeds the limit
    pub fn check(&self, metadata: &FileMetadata) -> Result<()> {
        if !metadata.mime_type.starts_with(IMAGE_MIME_PREFIX) {
            return Err(ClientError::InvalidFileType {
                mime_type: metadata.mime_type.clone(),
            });
        }

        if metadata.size > self.max_bytes {
            return Err(ClientError::FileTooLarge {
                size: metadata.size,
                limit: self.max_bytes,
            });
        }

        Ok(())
    }

    /// Validate a selected file and produce an immutable asset
    pub fn validate(&self, file: SelectedFile) -> Result<ImageAsset> {
        self.check(&file.metadata)?;
        Ok(ImageAsset::new(file.metadata, file.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    fn meta(mime: &str, size: u64) -> FileMetadata {
        FileMetadata::new("upload", mime, size)
    }

    #[test]
    fn test_accepts_images_up_to_limit() {
        let validator = ImageValidator::new();
        assert!(validator.check(&meta("image/png", 0)).is_ok());
        assert!(validator.check(&meta("image/jpeg", 2 * MIB)).is_ok());
        assert!(validator.check(&meta("image/webp", MAX_UPLOAD_BYTES)).is_ok());
    }

    #[test]
    fn test_rejects_oversized_images() {
        let validator = ImageValidator::new();
        for mime in ["image/png", "image/jpeg", "image/gif"] {
            let err = validator.check(&meta(mime, MAX_UPLOAD_BYTES + 1)).unwrap_err();
            assert!(matches!(err, ClientError::FileTooLarge { .. }));
        }
        let err = validator.check(&meta("image/jpeg", 25 * MIB)).unwrap_err();
        assert!(matches!(
            err,
            ClientError::FileTooLarge { size, limit } if size == 25 * MIB && limit == MAX_UPLOAD_BYTES
        ));
    }

    #[test]
    fn test_rejects_non_images() {
        let validator = ImageValidator::new();
        for mime in ["text/plain", "application/pdf", "", "IMAGE/PNG", "video/mp4"] {
            let err = validator.check(&meta(mime, 10)).unwrap_err();
            assert!(matches!(err, ClientError::InvalidFileType { .. }), "{mime}");
        }
    }

    #[test]
    fn test_type_checked_before_size() {
        let err = ImageValidator::new()
            .check(&meta("application/zip", 25 * MIB))
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidFileType { .. }));
    }

    #[test]
    fn test_custom_limit() {
        let validator = ImageValidator::with_max_bytes(100);
        assert!(validator.check(&meta("image/png", 100)).is_ok());
        assert!(validator.check(&meta("image/png", 101)).is_err());
    }

    #[test]
    fn test_validate_builds_asset() {
        let file = SelectedFile::from_bytes("cat.png", "image/png", vec![7; 16]);
        let asset = ImageValidator::new().validate(file).unwrap();
        assert_eq!(asset.name(), "cat.png");
        assert_eq!(asset.mime_type(), "image/png");
        assert_eq!(asset.size(), 16);
        assert_eq!(asset.content(), &[7; 16]);
    }
}
