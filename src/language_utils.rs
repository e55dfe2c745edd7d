use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities: the closed translation-target table and
/// transcription-language code resolution.
///
/// Translation backends speak short target codes; the transcription service
/// speaks ISO 639-3 codes. Both resolutions live here so nothing else in
/// the crate touches raw language strings.
/// A translation target: human-readable name mapped to a backend code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationTarget {
    /// Human-readable language name
    pub display_name: &'static str,
    /// Code passed to translation backends
    pub code: &'static str,
}

/// Code used when a requested target language is not in the table
pub const DEFAULT_TARGET_CODE: &str = "en";

/// Closed table of supported translation targets
pub const TARGET_LANGUAGES: &[TranslationTarget] = &[
    TranslationTarget { display_name: "English", code: "en" },
    TranslationTarget { display_name: "Spanish", code: "es" },
    TranslationTarget { display_name: "French", code: "fr" },
    TranslationTarget { display_name: "German", code: "de" },
    TranslationTarget { display_name: "Italian", code: "it" },
    TranslationTarget { display_name: "Portuguese", code: "pt" },
    TranslationTarget { display_name: "Russian", code: "ru" },
    TranslationTarget { display_name: "Japanese", code: "ja" },
    TranslationTarget { display_name: "Korean", code: "ko" },
    TranslationTarget { display_name: "Chinese (Simplified)", code: "zh" },
    TranslationTarget { display_name: "Hindi", code: "hi" },
    TranslationTarget { display_name: "Arabic", code: "ar" },
    TranslationTarget { display_name: "Dutch", code: "nl" },
    TranslationTarget { display_name: "Turkish", code: "tr" },
    TranslationTarget { display_name: "Polish", code: "pl" },
    TranslationTarget { display_name: "Swedish", code: "sv" },
    TranslationTarget { display_name: "Norwegian", code: "no" },
    TranslationTarget { display_name: "Danish", code: "da" },
    TranslationTarget { display_name: "Finnish", code: "fi" },
    TranslationTarget { display_name: "Czech", code: "cs" },
    TranslationTarget { display_name: "Greek", code: "el" },
    TranslationTarget { display_name: "Hebrew", code: "iw" },
    TranslationTarget { display_name: "Thai", code: "th" },
    TranslationTarget { display_name: "Vietnamese", code: "vi" },
    TranslationTarget { display_name: "Indonesian", code: "id" },
    TranslationTarget { display_name: "Ukrainian", code: "uk" },
    TranslationTarget { display_name: "Romanian", code: "ro" },
    TranslationTarget { display_name: "Hungarian", code: "hu" },
    TranslationTarget { display_name: "Bulgarian", code: "bg" },
];

/// Resolve a target language to a backend code.
///
/// Accepts either the display name or the code itself, case-insensitively.
/// Unknown languages resolve to the default English code.
pub fn resolve_target_code(language: &str) -> &'static str {
    let trimmed = language.trim();
    TARGET_LANGUAGES
        .iter()
        .find(|t| {
            t.display_name.eq_ignore_ascii_case(trimmed) || t.code.eq_ignore_ascii_case(trimmed)
        })
        .map(|t| t.code)
        .unwrap_or(DEFAULT_TARGET_CODE)
}

/// Look up the display name for a target code, when the code is known
pub fn target_display_name(code: &str) -> Option<&'static str> {
    TARGET_LANGUAGES
        .iter()
        .find(|t| t.code.eq_ignore_ascii_case(code.trim()))
        .map(|t| t.display_name)
}

/// Whether a resolved target code selects the English-enhancement path
pub fn is_english_target(code: &str) -> bool {
    code == "en"
}

/// Resolve a language name or ISO code to the ISO 639-3 code the
/// transcription service expects.
///
/// Accepts a 2-letter ISO 639-1 code, a 3-letter ISO 639-3 code, or an
/// English language name ("Spanish" -> "spa").
pub fn transcription_language_code(language: &str) -> Result<String> {
    let trimmed = language.trim();
    let lowered = trimmed.to_lowercase();

    if lowered.len() == 2 {
        if let Some(lang) = Language::from_639_1(&lowered) {
            return Ok(lang.to_639_3().to_string());
        }
    } else if lowered.len() == 3 && Language::from_639_3(&lowered).is_some() {
        return Ok(lowered);
    }

    if let Some(lang) = Language::from_name(trimmed) {
        return Ok(lang.to_639_3().to_string());
    }

    Err(anyhow!("Unrecognized language: {}", language))
}
