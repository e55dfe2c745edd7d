/*!
 * Backend implementations for the translation services.
 *
 * This module contains client implementations for the supported services:
 * - GoogleFree: generic public translation endpoint
 * - Libre: self-hosted/open alternative with multiple fallback endpoints
 * - Azure: credentialed commercial service (key + region required)
 *
 * All of them sit behind the `TranslationBackend` trait so the translator
 * core can walk an ordered attempt chain without caring which service is
 * answering.
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::{BackendError, ConfigError};

pub mod azure;
pub mod google;
pub mod libre;

pub use azure::Azure;
pub use google::GoogleFree;
pub use libre::Libre;

/// Per-request timeout for translation calls, shared by all backends
pub const REQUEST_TIMEOUT_SECS: u64 = 12;

/// Common trait for all translation backends
///
/// The source language is always auto-detected by the service; only the
/// target code is supplied per call.
#[async_trait]
pub trait TranslationBackend: Send + Sync + Debug {
    /// Short identifier used in logs and error messages
    fn name(&self) -> &'static str;

    /// Translate text into the target language
    ///
    /// # Arguments
    /// * `text` - The text to translate
    /// * `target_code` - Target language code from the translation table
    ///
    /// # Returns
    /// * `Result<String, BackendError>` - The translated text or an error
    async fn translate(&self, text: &str, target_code: &str) -> Result<String, BackendError>;
}

/// Translation service selector
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    // @service: generic public translation endpoint
    #[default]
    GoogleFree,
    // @service: open alternative with fallback endpoints
    Libre,
    // @service: credentialed commercial service
    Azure,
}

impl BackendKind {
    // @returns: Capitalized service name
    pub fn display_name(&self) -> &str {
        match self {
            Self::GoogleFree => "Google (free)",
            Self::Libre => "LibreTranslate",
            Self::Azure => "Azure Translator",
        }
    }

    // @returns: Lowercase service identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::GoogleFree => "google_free".to_string(),
            Self::Libre => "libre".to_string(),
            Self::Azure => "azure".to_string(),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google_free" | "google" => Ok(Self::GoogleFree),
            "libre" | "libretranslate" => Ok(Self::Libre),
            "azure" => Ok(Self::Azure),
            _ => Err(ConfigError::UnknownService(s.to_string())),
        }
    }
}

/// Credential for backends that mandate one
#[derive(Debug, Clone)]
pub struct BackendCredential {
    /// API key
    pub api_key: String,
    /// Service region
    pub region: String,
}

/// Build the ordered attempt chain for a service selector.
///
/// The free tiers fall back to each other (google_free -> libre, libre ->
/// google_free); the credentialed service stands alone, so a failed call
/// leaves the text untranslated for the caller to detect by equality.
/// A missing credential is rejected here, before any network call.
pub fn build_chain(
    kind: &BackendKind,
    credential: Option<&BackendCredential>,
) -> Result<Vec<Box<dyn TranslationBackend>>, ConfigError> {
    match kind {
        BackendKind::GoogleFree => Ok(vec![
            Box::new(GoogleFree::new()),
            Box::new(Libre::new()),
        ]),
        BackendKind::Libre => Ok(vec![
            Box::new(Libre::new()),
            Box::new(GoogleFree::new()),
        ]),
        BackendKind::Azure => {
            let credential = credential
                .ok_or_else(|| ConfigError::MissingCredential("azure".to_string()))?;
            let client = Azure::new(credential.api_key.clone(), credential.region.clone())?;
            Ok(vec![Box::new(client)])
        }
    }
}
