use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::backends::{BackendCredential, BackendKind};
use crate::errors::ConfigError;
use crate::segmenter::SegmenterConfig;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Segmentation settings
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// Translation settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings controlling how words are grouped into cues
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SegmentationConfig {
    /// Maximum cue duration in seconds
    #[serde(default = "default_max_segment_duration_secs")]
    pub max_segment_duration_secs: f64,

    /// Maximum number of words per cue
    #[serde(default = "default_max_words_per_segment")]
    pub max_words_per_segment: usize,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            max_segment_duration_secs: default_max_segment_duration_secs(),
            max_words_per_segment: default_max_words_per_segment(),
        }
    }
}

impl SegmentationConfig {
    /// Build the segmenter limits from this configuration
    pub fn to_segmenter_config(&self) -> SegmenterConfig {
        SegmenterConfig {
            max_segment_duration_secs: self.max_segment_duration_secs,
            max_words_per_segment: self.max_words_per_segment,
        }
    }
}

/// Settings for the translation pipeline
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation service to use
    #[serde(default)]
    pub service: BackendKind,

    /// Maximum number of languages translated at once
    #[serde(default = "default_concurrent_languages")]
    pub concurrent_languages: usize,

    /// Gap in seconds that closes a conversation segment
    #[serde(default = "default_conversation_gap_secs")]
    pub conversation_gap_secs: f64,

    /// API key for credentialed services
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service region for credentialed services
    #[serde(default = "String::new")]
    pub region: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            service: BackendKind::default(),
            concurrent_languages: default_concurrent_languages(),
            conversation_gap_secs: default_conversation_gap_secs(),
            api_key: String::new(),
            region: String::new(),
        }
    }
}

impl TranslationConfig {
    /// Conversation segment gap threshold in milliseconds
    pub fn conversation_gap_ms(&self) -> u64 {
        (self.conversation_gap_secs * 1000.0) as u64
    }

    /// Credential from configuration, when one is set
    pub fn credential(&self) -> Option<BackendCredential> {
        if self.api_key.trim().is_empty() {
            return None;
        }
        Some(BackendCredential {
            api_key: self.api_key.clone(),
            region: self.region.clone(),
        })
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to the log crate's level filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file when it exists, defaults otherwise
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segmentation.max_words_per_segment == 0 {
            return Err(ConfigError::Invalid(
                "max_words_per_segment must be at least 1".to_string(),
            ));
        }
        if self.segmentation.max_segment_duration_secs <= 0.0 {
            return Err(ConfigError::Invalid(
                "max_segment_duration_secs must be positive".to_string(),
            ));
        }
        if self.translation.conversation_gap_secs < 0.0 {
            return Err(ConfigError::Invalid(
                "conversation_gap_secs must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            segmentation: SegmentationConfig::default(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

fn default_max_segment_duration_secs() -> f64 {
    5.0
}

fn default_max_words_per_segment() -> usize {
    8
}

fn default_concurrent_languages() -> usize {
    3
}

fn default_conversation_gap_secs() -> f64 {
    3.0
}
