use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::errors::BackendError;

use super::{REQUEST_TIMEOUT_SECS, TranslationBackend};

/// Public translation endpoint (no key required)
const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Client for the generic public translation service
#[derive(Debug)]
pub struct GoogleFree {
    /// HTTP client for making requests
    client: Client,
    /// Service endpoint URL
    endpoint: String,
}

impl Default for GoogleFree {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleFree {
    /// Create a client against the public endpoint
    pub fn new() -> Self {
        Self::from_url(DEFAULT_ENDPOINT)
    }

    /// Create a client against a custom endpoint (used by tests)
    pub fn from_url(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl TranslationBackend for GoogleFree {
    fn name(&self) -> &'static str {
        "google_free"
    }

    async fn translate(&self, text: &str, target_code: &str) -> Result<String, BackendError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_code),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Translation endpoint error ({}): {}", status, message);
            return Err(BackendError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| BackendError::ParseError(e.to_string()))?;

        // The response is a nested JSON array; the first element lists the
        // translated chunks, each chunk carrying its text at index 0.
        let chunks = value
            .get(0)
            .and_then(|v| v.as_array())
            .ok_or_else(|| BackendError::ParseError("Unexpected response shape".to_string()))?;

        let mut translated = String::new();
        for chunk in chunks {
            if let Some(part) = chunk.get(0).and_then(|v| v.as_str()) {
                translated.push_str(part);
            }
        }

        if translated.trim().is_empty() {
            return Err(BackendError::EmptyTranslation);
        }

        Ok(translated)
    }
}
