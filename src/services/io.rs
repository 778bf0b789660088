//! Local file intake
//!
//! Reads files from disk into [`SelectedFile`] values, deriving the MIME type
//! the way a browser would report it for a picked file. Metadata comes from
//! the filesystem and a short header read, so intake rules are applied before
//! any content is loaded.

use crate::{
    error::{ClientError, Result},
    types::{FileMetadata, SelectedFile},
    utils::ImageValidator,
};
use image::ImageFormat;
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// MIME type reported when nothing better is known
pub const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// Header bytes read for content sniffing
const SNIFF_LEN: u64 = 64;

/// Service for reading user-selected files
pub struct ImageIoService;

impl ImageIoService {
    /// Describe a file without reading its content
    ///
    /// Size comes from filesystem metadata; the MIME type is sniffed from the
    /// first few bytes, then guessed from the extension.
    pub async fn inspect<P: AsRef<Path>>(path: P) -> Result<FileMetadata> {
        let path_ref = path.as_ref();
        let io_error = |e: std::io::Error| ClientError::file_io_error("read input file", path_ref, &e);

        let file = tokio::fs::File::open(path_ref).await.map_err(io_error)?;
        let size = file.metadata().await.map_err(io_error)?.len();

        let mut header = Vec::with_capacity(SNIFF_LEN as usize);
        file.take(SNIFF_LEN)
            .read_to_end(&mut header)
            .await
            .map_err(io_error)?;

        Ok(FileMetadata::new(
            Self::file_name(path_ref),
            Self::detect_mime_type(path_ref, &header),
            size,
        ))
    }

    /// Read a file for intake, loading content only if `validator` accepts it
    ///
    /// A rejected file comes back with its metadata and no content, so the
    /// workflow reports the rejection exactly like a declared browser file.
    ///
    /// # Examples
    /// ```rust,no_run
    /// use bgremove_client::{services::ImageIoService, ImageValidator};
    ///
    /// # async fn example() -> bgremove_client::Result<()> {
    /// let file = ImageIoService::load_file("portrait.jpg", &ImageValidator::new()).await?;
    /// println!("{} ({})", file.metadata.name, file.metadata.mime_type);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn load_file<P: AsRef<Path>>(
        path: P,
        validator: &ImageValidator,
    ) -> Result<SelectedFile> {
        let path_ref = path.as_ref();
        let metadata = Self::inspect(path_ref).await?;

        if let Err(rejection) = validator.check(&metadata) {
            debug!(
                path = %path_ref.display(),
                reason = %rejection,
                "Input rejected before reading content"
            );
            return Ok(SelectedFile {
                metadata,
                content: Vec::new(),
            });
        }

        let content = tokio::fs::read(path_ref)
            .await
            .map_err(|e| ClientError::file_io_error("read input file", path_ref, &e))?;

        debug!(
            path = %path_ref.display(),
            mime_type = %metadata.mime_type,
            size = content.len(),
            "Loaded input file"
        );

        Ok(SelectedFile::from_bytes(metadata.name, metadata.mime_type, content))
    }

    /// MIME type from content sniffing, then the file extension
    #[must_use]
    pub fn detect_mime_type(path: &Path, content: &[u8]) -> &'static str {
        if let Ok(format) = image::guess_format(content) {
            return format.to_mime_type();
        }

        ImageFormat::from_path(path).map_or(UNKNOWN_MIME_TYPE, |format| format.to_mime_type())
    }

    fn file_name(path: &Path) -> String {
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::mock::png_bytes;
    use tempfile::TempDir;

    #[test]
    fn test_detect_from_content() {
        let png = png_bytes(1, 1, [0, 0, 0, 255]);
        assert_eq!(
            ImageIoService::detect_mime_type(Path::new("no_extension"), &png),
            "image/png"
        );
    }

    #[test]
    fn test_detect_from_extension() {
        assert_eq!(
            ImageIoService::detect_mime_type(Path::new("photo.jpg"), b"garbage"),
            "image/jpeg"
        );
        assert_eq!(
            ImageIoService::detect_mime_type(Path::new("notes.txt"), b"hello"),
            UNKNOWN_MIME_TYPE
        );
    }

    #[tokio::test]
    async fn test_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pixel.png");
        std::fs::write(&path, png_bytes(2, 2, [9, 9, 9, 255])).unwrap();

        let file = ImageIoService::load_file(&path, &ImageValidator::new())
            .await
            .unwrap();
        assert_eq!(file.metadata.name, "pixel.png");
        assert_eq!(file.metadata.mime_type, "image/png");
        assert_eq!(file.metadata.size, file.content.len() as u64);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = ImageIoService::load_file("/definitely/not/here.png", &ImageValidator::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("read input file"));
    }

    #[tokio::test]
    async fn test_oversized_file_is_not_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("huge.png");
        let mut file = std::fs::File::create(&path).unwrap();
        std::io::Write::write_all(&mut file, &png_bytes(1, 1, [0, 0, 0, 255])).unwrap();
        // Sparse on most filesystems: the size is declared, not written.
        file.set_len(64 * 1024 * 1024).unwrap();
        drop(file);

        let validator = ImageValidator::new();
        let selected = ImageIoService::load_file(&path, &validator).await.unwrap();
        assert_eq!(selected.metadata.size, 64 * 1024 * 1024);
        assert_eq!(selected.metadata.mime_type, "image/png");
        assert!(selected.content.is_empty());

        let err = validator.validate(selected).unwrap_err();
        assert!(matches!(err, ClientError::FileTooLarge { .. }));
    }

    #[tokio::test]
    async fn test_non_image_is_not_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"just some text").unwrap();

        let selected = ImageIoService::load_file(&path, &ImageValidator::new())
            .await
            .unwrap();
        assert_eq!(selected.metadata.mime_type, UNKNOWN_MIME_TYPE);
        assert_eq!(selected.metadata.size, 14);
        assert!(selected.content.is_empty());
    }

    #[tokio::test]
    async fn test_inspect_reads_size_and_type() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no_extension");
        let png = png_bytes(3, 3, [1, 2, 3, 255]);
        std::fs::write(&path, &png).unwrap();

        let metadata = ImageIoService::inspect(&path).await.unwrap();
        assert_eq!(metadata.name, "no_extension");
        assert_eq!(metadata.mime_type, "image/png");
        assert_eq!(metadata.size, png.len() as u64);
    }
}
