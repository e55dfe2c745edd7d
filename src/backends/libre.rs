use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::BackendError;

use super::{REQUEST_TIMEOUT_SECS, TranslationBackend};

/// Public instances tried in order until one produces a usable result
const DEFAULT_ENDPOINTS: [&str; 3] = [
    "https://libretranslate.de/translate",
    "https://translate.argosopentech.com/translate",
    "https://libretranslate.com/translate",
];

/// Translation request body
#[derive(Debug, Serialize)]
struct LibreRequest<'a> {
    /// Text to translate
    q: &'a str,
    /// Source language ("auto" for detection)
    source: &'a str,
    /// Target language code
    target: &'a str,
    /// Payload format
    format: &'a str,
}

/// Translation response body
#[derive(Debug, Deserialize)]
struct LibreResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// Client for the open translation alternative.
///
/// Public instances come and go, so the client carries an ordered endpoint
/// list and walks it until one endpoint returns a non-empty, changed
/// translation.
#[derive(Debug)]
pub struct Libre {
    /// HTTP client for making requests
    client: Client,
    /// Endpoint URLs, tried in order
    endpoints: Vec<String>,
}

impl Default for Libre {
    fn default() -> Self {
        Self::new()
    }
}

impl Libre {
    /// Create a client with the default public endpoint list
    pub fn new() -> Self {
        Self::with_endpoints(DEFAULT_ENDPOINTS.iter().map(|e| e.to_string()).collect())
    }

    /// Create a client with a custom endpoint list (used by tests)
    pub fn with_endpoints(endpoints: Vec<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            endpoints,
        }
    }

    /// Try a single endpoint once
    async fn translate_at(
        &self,
        endpoint: &str,
        text: &str,
        target_code: &str,
    ) -> Result<String, BackendError> {
        let request = LibreRequest {
            q: text,
            source: "auto",
            target: target_code,
            format: "text",
        };

        let response = self
            .client
            .post(endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(BackendError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body: LibreResponse = response
            .json()
            .await
            .map_err(|e| BackendError::ParseError(e.to_string()))?;

        Ok(body.translated_text)
    }
}

#[async_trait]
impl TranslationBackend for Libre {
    fn name(&self) -> &'static str {
        "libre"
    }

    async fn translate(&self, text: &str, target_code: &str) -> Result<String, BackendError> {
        let mut last_error = None;

        for endpoint in &self.endpoints {
            match self.translate_at(endpoint, text, target_code).await {
                Ok(translated) => {
                    // An instance that echoes the input back is as useless
                    // as one that errors; move on to the next endpoint.
                    if !translated.trim().is_empty() && translated != text {
                        return Ok(translated);
                    }
                    debug!("Endpoint {} returned an empty or unchanged translation", endpoint);
                    last_error = Some(BackendError::EmptyTranslation);
                }
                Err(e) => {
                    error!("Endpoint {} failed: {}", endpoint, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(BackendError::EmptyTranslation))
    }
}
