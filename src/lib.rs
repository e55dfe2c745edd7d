/*!
 * # subgen - Subtitle Generator & Translator
 *
 * A Rust library for generating subtitles from speech transcriptions and
 * translating them while preserving cue structure.
 *
 * ## Features
 *
 * - Group word-level transcripts into readable subtitle cues
 * - Emit and reparse SRT and WebVTT tracks
 * - Translate tracks into other languages with per-cue timing and
 *   speaker attribution guaranteed to survive translation
 * - Context-aware English enhancement with conversation batching
 * - Translation backends with ordered fallback:
 *   - Generic public translation endpoint
 *   - LibreTranslate-style open alternative (multiple endpoints)
 *   - Credentialed commercial service (key + region)
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `transcription`: Speech-to-text collaborator client and word model
 * - `segmenter`: Word-to-cue grouping
 * - `subtitle_processor`: Cue model, timestamp codec, emitters and parser
 * - `translation`: Structure-preserving translation:
 *   - `translation::core`: Per-cue translation and backend chain walking
 *   - `translation::segments`: Conversation segment grouping
 *   - `translation::english`: English-target enhancement
 *   - `translation::batch`: Concurrent multi-language orchestration
 * - `backends`: Clients for the translation services
 * - `media`: Audio extraction from video bytes
 * - `session`: TTL-bounded in-memory session store
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: Language tables and code resolution
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod backends;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod media;
pub mod segmenter;
pub mod session;
pub mod subtitle_processor;
pub mod transcription;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use backends::{BackendCredential, BackendKind, TranslationBackend};
pub use errors::{AppError, BackendError, ConfigError, SubtitleError, TranslationError, UpstreamError};
pub use language_utils::{TARGET_LANGUAGES, resolve_target_code};
pub use segmenter::{Segmenter, SegmenterConfig};
pub use subtitle_processor::{SubtitleCue, SubtitleTrack};
pub use transcription::{SpeechToTextClient, Transcription, Word};
pub use translation::{CueTranslator, LanguageResult, MultiLanguageTranslator};
