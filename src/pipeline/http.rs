//! HTTP transport for the removal service
//!
//! Uploads go out as `multipart/form-data` with a single `file` field to
//! `POST {base}/api/remove-background-base64`.

use super::{error_from_body, RemovalResponse, RemovalService};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::types::ImageAsset;
use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::Deserialize;
use tracing::{debug, warn};

/// Readiness payload of `GET {base}/api/`
#[derive(Debug, Deserialize)]
struct HealthResponse {
    message: String,
}

/// Removal service reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpRemovalService {
    client: Client,
    endpoint: String,
    health_endpoint: String,
}

impl HttpRemovalService {
    /// Create a new HTTP service from configuration
    ///
    /// # Errors
    /// - Invalid configuration
    /// - Failed to create HTTP client
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::network_error("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            endpoint: config.endpoint_url(),
            health_endpoint: config.health_url(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Probe the service's readiness endpoint and return its message
    pub async fn health_check(&self) -> Result<String> {
        debug!(url = %self.health_endpoint, "Checking removal service");

        let response = self
            .client
            .get(&self.health_endpoint)
            .send()
            .await
            .map_err(|e| ClientError::network_error("Failed to reach removal service", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_body(status.as_u16(), &body));
        }

        let health: HealthResponse = response
            .json()
            .await
            .map_err(|e| ClientError::decode(format!("Unexpected health response: {}", e)))?;
        Ok(health.message)
    }

    fn form_for(asset: &ImageAsset) -> Result<multipart::Form> {
        let part = multipart::Part::bytes(asset.content().to_vec())
            .file_name(asset.name().to_string())
            .mime_str(asset.mime_type())
            .map_err(|e| {
                ClientError::network_error(
                    &format!("Invalid content type '{}'", asset.mime_type()),
                    e,
                )
            })?;
        Ok(multipart::Form::new().part("file", part))
    }
}

#[async_trait]
impl RemovalService for HttpRemovalService {
    async fn remove_background(&self, asset: &ImageAsset) -> Result<RemovalResponse> {
        let form = Self::form_for(asset)?;

        debug!(url = %self.endpoint, size = asset.size(), "Uploading image");
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::network_error("Failed to reach removal service", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = error_from_body(status.as_u16(), &body);
            warn!(status = status.as_u16(), error = %error, "Removal request rejected");
            return Err(error);
        }

        response
            .json::<RemovalResponse>()
            .await
            .map_err(|e| ClientError::decode(format!("Unexpected removal response: {}", e)))
    }

    fn name(&self) -> &str {
        "http"
    }
}
