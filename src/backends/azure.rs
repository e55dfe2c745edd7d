use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;

use crate::errors::{BackendError, ConfigError};

use super::{REQUEST_TIMEOUT_SECS, TranslationBackend};

/// Commercial translation API endpoint
const DEFAULT_ENDPOINT: &str = "https://api.cognitive.microsofttranslator.com";

/// Client for the credentialed commercial translation service.
///
/// Both the subscription key and the region are mandatory and validated at
/// construction time, before any network call is attempted. This tier has
/// no fallback: a failed call leaves the cue untranslated.
#[derive(Debug)]
pub struct Azure {
    /// HTTP client for API requests
    client: Client,
    /// Subscription key for authentication
    api_key: String,
    /// Service region the subscription is bound to
    region: String,
    /// Service endpoint URL
    endpoint: String,
}

impl Azure {
    /// Create a client, rejecting missing credentials up front
    pub fn new(api_key: String, region: String) -> Result<Self, ConfigError> {
        if api_key.trim().is_empty() || region.trim().is_empty() {
            return Err(ConfigError::MissingCredential("azure".to_string()));
        }

        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            api_key,
            region,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        })
    }

    /// Override the endpoint (used by tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl TranslationBackend for Azure {
    fn name(&self) -> &'static str {
        "azure"
    }

    async fn translate(&self, text: &str, target_code: &str) -> Result<String, BackendError> {
        let url = format!("{}/translate", self.endpoint);

        let response = self
            .client
            .post(&url)
            .query(&[("api-version", "3.0"), ("to", target_code)])
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("Ocp-Apim-Subscription-Region", &self.region)
            .json(&json!([{ "Text": text }]))
            .send()
            .await
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Azure Translator error ({}): {}", status, message);
            return Err(BackendError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| BackendError::ParseError(e.to_string()))?;

        let translated = value
            .get(0)
            .and_then(|v| v.get("translations"))
            .and_then(|v| v.get(0))
            .and_then(|v| v.get("text"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| BackendError::ParseError("Unexpected response shape".to_string()))?;

        if translated.trim().is_empty() {
            return Err(BackendError::EmptyTranslation);
        }

        Ok(translated.to_string())
    }
}
