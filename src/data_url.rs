//! `data:` URL handling for images exchanged with the removal service
//!
//! The service returns both images as `data:<mime>;base64,<payload>` strings.
//! A [`DataUrl`] is the decoded, renderable handle to such an image.

use crate::error::{ClientError, Result};
use base64::{engine::general_purpose, Engine as _};
use std::fmt;
use std::str::FromStr;

const DATA_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// Decoded image content together with its MIME type
#[derive(Clone, PartialEq, Eq)]
pub struct DataUrl {
    mime_type: String,
    data: Vec<u8>,
}

impl DataUrl {
    pub fn new<S: Into<String>>(mime_type: S, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Parse a base64 `data:` URL
    ///
    /// # Errors
    /// - Missing `data:` scheme or `,` separator
    /// - Payload not marked as base64
    /// - Invalid base64 payload
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim();
        let rest = normalized
            .strip_prefix(DATA_SCHEME)
            .ok_or_else(|| ClientError::decode("data URL must start with 'data:'"))?;

        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| ClientError::decode("data URL is missing the ',' separator"))?;

        let mime_type = header
            .strip_suffix(BASE64_MARKER)
            .ok_or_else(|| ClientError::decode("only base64 data URLs are supported"))?;

        let data = general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| ClientError::decode(format!("invalid base64 payload: {}", e)))?;

        let mime_type = if mime_type.is_empty() {
            "application/octet-stream"
        } else {
            mime_type
        };

        Ok(Self::new(mime_type, data))
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Decode the payload into pixels
    pub fn decode_image(&self) -> Result<image::DynamicImage> {
        image::load_from_memory(&self.data)
            .map_err(|e| ClientError::decode(format!("failed to decode {}: {}", self.mime_type, e)))
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{},{}",
            DATA_SCHEME,
            self.mime_type,
            BASE64_MARKER,
            general_purpose::STANDARD.encode(&self.data)
        )
    }
}

// Payloads can be megabytes; never dump them.
impl fmt::Debug for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataUrl")
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}

impl FromStr for DataUrl {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_png_data_url() {
        let url = DataUrl::parse("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(url.mime_type(), "image/png");
        assert_eq!(url.bytes(), b"hello");
        assert_eq!(url.len(), 5);
    }

    #[test]
    fn test_display_produces_parseable_url() {
        let url = DataUrl::new("image/jpeg", vec![0xFF, 0xD8, 0xFF]);
        let text = url.to_string();
        assert!(text.starts_with("data:image/jpeg;base64,"));
        assert_eq!(text.parse::<DataUrl>().unwrap(), url);
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(DataUrl::parse("image/png;base64,aGVsbG8=").is_err());
        assert!(DataUrl::parse("data:image/png;base64").is_err());
        assert!(DataUrl::parse("data:image/png,hello").is_err());
        assert!(DataUrl::parse("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_missing_mime_defaults_to_octet_stream() {
        let url = DataUrl::parse("data:;base64,aGk=").unwrap();
        assert_eq!(url.mime_type(), "application/octet-stream");
    }

    #[test]
    fn test_debug_hides_payload() {
        let url = DataUrl::new("image/png", vec![1; 4096]);
        let debug = format!("{:?}", url);
        assert!(debug.contains("len: 4096"));
        assert!(debug.len() < 100);
    }
}
