/*!
 * Structure-preserving translation of subtitle tracks.
 *
 * This module turns a parsed cue sequence into a translated one while
 * guaranteeing that cue count, ids, and timing never change. It is split
 * into several submodules:
 *
 * - `core`: per-cue translation and the backend attempt chain
 * - `segments`: conversation segment grouping by timing gaps
 * - `english`: context-aware English enhancement and cleanup policy
 * - `batch`: concurrent multi-language orchestration
 */

// Re-export main types for easier usage
pub use self::batch::{
    LanguageOutcome, LanguageResult, MultiLanguageTranslator, TranslationJobState,
};
pub use self::core::CueTranslator;
pub use self::english::{EnglishPolish, PolishPolicy};
pub use self::segments::{DEFAULT_MAX_GAP_MS, group_conversation_segments};

// Submodules
pub mod batch;
pub mod core;
pub mod english;
pub mod segments;
