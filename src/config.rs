//! Configuration for the background removal client

use crate::error::{ClientError, Result};
use crate::geometry::DEFAULT_SLIDER_POSITION;
use crate::utils::validation::{NumericValidator, MAX_UPLOAD_BYTES};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the service base URL
pub const BACKEND_URL_ENV: &str = "BGREMOVE_BACKEND_URL";

/// Path of the base64 removal endpoint, relative to the base URL
pub const REMOVE_BACKGROUND_PATH: &str = "/api/remove-background-base64";

/// Path of the service readiness endpoint
pub const HEALTH_PATH: &str = "/api/";

/// File name used when saving the processed image
pub const DEFAULT_EXPORT_FILE_NAME: &str = "background_removed.png";

/// Configuration for talking to the removal service and driving the workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the removal service, e.g. `http://localhost:8001`
    pub backend_base_url: String,

    /// Largest accepted upload in bytes
    pub max_upload_bytes: u64,

    /// Optional request timeout (`None` waits indefinitely)
    pub request_timeout: Option<Duration>,

    /// File name for exported images
    pub export_file_name: String,

    /// Slider position after a result arrives and after reset
    pub default_slider_position: u8,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_base_url: "http://localhost:8001".to_string(),
            max_upload_bytes: MAX_UPLOAD_BYTES,
            request_timeout: None,
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            default_slider_position: DEFAULT_SLIDER_POSITION,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    ///
    /// # Examples
    /// ```rust
    /// use bgremove_client::ClientConfig;
    ///
    /// let config = ClientConfig::builder()
    ///     .backend_base_url("https://bgremove.example.com")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(
    ///     config.endpoint_url(),
    ///     "https://bgremove.example.com/api/remove-background-base64"
    /// );
    /// ```
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Configuration with the base URL taken from `BGREMOVE_BACKEND_URL`
    ///
    /// # Errors
    /// - Variable unset or empty
    /// - Resulting configuration invalid
    pub fn from_env() -> Result<Self> {
        let base = std::env::var(BACKEND_URL_ENV).map_err(|_| {
            ClientError::invalid_config(format!("{} is not set", BACKEND_URL_ENV))
        })?;
        Self::builder().backend_base_url(base).build()
    }

    /// Full URL of the removal endpoint
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        self.join(REMOVE_BACKGROUND_PATH)
    }

    /// Full URL of the readiness endpoint
    #[must_use]
    pub fn health_url(&self) -> String {
        self.join(HEALTH_PATH)
    }

    fn join(&self, path: &str) -> String {
        format!("{}{}", self.backend_base_url.trim_end_matches('/'), path)
    }

    /// Validate all configuration parameters
    ///
    /// # Validation Rules
    ///
    /// - Base URL: non-empty, `http://` or `https://`
    /// - Upload limit: at least one byte
    /// - Default slider position: 0-100
    /// - Export file name: non-empty, no path separators
    pub fn validate(&self) -> Result<()> {
        let base = self.backend_base_url.trim();
        if base.is_empty() {
            return Err(ClientError::invalid_config("backend base URL is empty"));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ClientError::invalid_config(format!(
                "backend base URL must use http or https: {}",
                base
            )));
        }

        NumericValidator::validate_byte_limit(self.max_upload_bytes)?;
        NumericValidator::validate_slider_position(i64::from(self.default_slider_position))?;

        if self.export_file_name.is_empty()
            || self
                .export_file_name
                .contains(|c: char| c == '/' || c == '\\')
        {
            return Err(ClientError::invalid_config(format!(
                "export file name must be a bare file name: '{}'",
                self.export_file_name
            )));
        }

        Ok(())
    }
}

/// Builder for `ClientConfig`
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    #[must_use]
    pub fn backend_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.backend_base_url = url.into().trim().to_string();
        self
    }

    #[must_use]
    pub fn max_upload_bytes(mut self, bytes: u64) -> Self {
        self.config.max_upload_bytes = bytes;
        self
    }

    /// Opt-in request timeout
    #[must_use]
    pub fn request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn export_file_name<S: Into<String>>(mut self, name: S) -> Self {
        self.config.export_file_name = name.into();
        self
    }

    /// Set the default slider position (clamped to 0-100)
    #[must_use]
    pub fn default_slider_position(mut self, position: u8) -> Self {
        self.config.default_slider_position = position.min(100);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ClientConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.export_file_name, "background_removed.png");
        assert_eq!(config.default_slider_position, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_endpoint_url_joins_cleanly() {
        let config = ClientConfig::builder()
            .backend_base_url("http://localhost:8001/")
            .build()
            .unwrap();
        assert_eq!(
            config.endpoint_url(),
            "http://localhost:8001/api/remove-background-base64"
        );
        assert_eq!(config.health_url(), "http://localhost:8001/api/");
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(ClientConfig::builder().backend_base_url("").build().is_err());
        assert!(ClientConfig::builder()
            .backend_base_url("ftp://example.com")
            .build()
            .is_err());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(ClientConfig::builder().max_upload_bytes(0).build().is_err());
        assert!(ClientConfig::builder()
            .export_file_name("../escape.png")
            .build()
            .is_err());

        let mut config = ClientConfig::default();
        config.default_slider_position = 101;
        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("slider position"));
    }

    #[test]
    fn test_builder_clamps_slider() {
        let config = ClientConfig::builder()
            .default_slider_position(200)
            .build()
            .unwrap();
        assert_eq!(config.default_slider_position, 100);
    }

    #[test]
    fn test_serde_round_trip_keeps_timeout() {
        let config = ClientConfig::builder()
            .request_timeout(Some(Duration::from_secs(30)))
            .build()
            .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ClientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
