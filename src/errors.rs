/*!
 * Error types for the subgen application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to a translation backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// The backend answered, but with nothing usable
    #[error("Backend returned an empty or unchanged translation")]
    EmptyTranslation,
}

/// Errors that can occur during subtitle parsing and formatting
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A timestamp did not match the HH:MM:SS,mmm structure
    #[error("Invalid timestamp: {0}")]
    Timestamp(String),

    /// A cue block was structurally unusable
    #[error("Invalid cue block: {0}")]
    Block(String),
}

/// Errors that can occur during translation of a language job
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the backend API
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Every cue came back untranslated for this language
    #[error("Translation produced no changes for language: {0}")]
    Unchanged(String),
}

/// Errors from upstream collaborators (speech-to-text service)
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Transport-level failure reaching the service
    #[error("Transcription request failed: {0}")]
    Transport(String),

    /// The service rejected the request
    #[error("Transcription service responded with error: {status_code} - {message}")]
    Rejected {
        /// HTTP status code
        status_code: u16,
        /// Error message from the service
        message: String,
    },
}

/// Errors raised before any work is attempted
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A backend that mandates a credential was selected without one
    #[error("Missing credential for backend: {0}")]
    MissingCredential(String),

    /// The requested backend name is not recognized
    #[error("Unknown translation service: {0}")]
    UnknownService(String),

    /// The configuration file could not be read or parsed
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a translation backend
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from an upstream collaborator
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Error in configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
