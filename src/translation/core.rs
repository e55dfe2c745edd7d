/*!
 * Core structure-preserving translation.
 *
 * The translator rewrites only the free-text payload of each cue: ids and
 * timing are copied through untouched, and a leading speaker tag is split
 * off before translation and reattached unchanged afterwards. Backends are
 * walked as an ordered attempt chain; when every attempt fails the original
 * text is kept, which callers detect by string equality.
 */

use log::{debug, warn};

use crate::backends::{BackendCredential, BackendKind, TranslationBackend, build_chain};
use crate::errors::ConfigError;
use crate::language_utils::{is_english_target, resolve_target_code};
use crate::subtitle_processor::{SubtitleCue, attach_speaker_tag, split_speaker_tag};

use super::english::{EnglishEnhancer, EnglishPolish, PolishPolicy};
use super::segments::DEFAULT_MAX_GAP_MS;

/// Walk the backend chain until one attempt yields a usable translation.
///
/// An attempt counts only if it returns non-empty text that differs from
/// the input. Returns `None` when the whole chain is exhausted.
pub(crate) async fn attempt_chain(
    chain: &[Box<dyn TranslationBackend>],
    text: &str,
    target_code: &str,
) -> Option<String> {
    for backend in chain {
        match backend.translate(text, target_code).await {
            Ok(translated) if !translated.trim().is_empty() && translated != text => {
                debug!("Backend {} translated {} chars", backend.name(), text.len());
                return Some(translated);
            }
            Ok(_) => {
                warn!("Backend {} returned an empty or unchanged translation", backend.name());
            }
            Err(e) => {
                warn!("Backend {} failed: {}", backend.name(), e);
            }
        }
    }
    None
}

/// Structure-preserving cue translator
pub struct CueTranslator {
    /// Ordered backend attempt chain
    chain: Vec<Box<dyn TranslationBackend>>,

    /// Cleanup policy for the English-enhancement path
    polish: Box<dyn PolishPolicy>,

    /// Conversation segment gap threshold in milliseconds
    max_gap_ms: u64,
}

impl CueTranslator {
    /// Create a translator for a service selector.
    ///
    /// A missing credential for a backend that mandates one is rejected
    /// here, before any network call.
    pub fn new(
        kind: &BackendKind,
        credential: Option<&BackendCredential>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::with_chain(build_chain(kind, credential)?))
    }

    /// Create a translator over an explicit backend chain
    pub fn with_chain(chain: Vec<Box<dyn TranslationBackend>>) -> Self {
        Self {
            chain,
            polish: Box::new(EnglishPolish),
            max_gap_ms: DEFAULT_MAX_GAP_MS,
        }
    }

    /// Swap the English cleanup policy
    pub fn with_polish_policy(mut self, polish: Box<dyn PolishPolicy>) -> Self {
        self.polish = polish;
        self
    }

    /// Override the conversation segment gap threshold
    pub fn with_conversation_gap_ms(mut self, max_gap_ms: u64) -> Self {
        self.max_gap_ms = max_gap_ms;
        self
    }

    /// Translate a cue sequence into the target language.
    ///
    /// The target is resolved through the translation table (unknown
    /// languages resolve to English). The output always has the same length
    /// and per-position id/start/end as the input.
    pub async fn translate_cues(
        &self,
        cues: &[SubtitleCue],
        target_language: &str,
    ) -> Vec<SubtitleCue> {
        let target_code = resolve_target_code(target_language);

        if cues.is_empty() {
            return Vec::new();
        }

        if is_english_target(target_code) {
            let enhancer =
                EnglishEnhancer::new(&self.chain, self.polish.as_ref(), self.max_gap_ms);
            return enhancer.translate_cues(cues).await;
        }

        let mut out = Vec::with_capacity(cues.len());
        for cue in cues {
            out.push(self.translate_cue(cue, target_code).await);
        }
        out
    }

    /// Translate one cue, preserving any speaker tag
    async fn translate_cue(&self, cue: &SubtitleCue, target_code: &str) -> SubtitleCue {
        match split_speaker_tag(&cue.text) {
            Some((speaker, remainder)) => {
                // A tag with nothing after it has no payload to translate
                if remainder.trim().is_empty() {
                    return cue.clone();
                }
                let translated = attempt_chain(&self.chain, remainder, target_code)
                    .await
                    .unwrap_or_else(|| remainder.to_string());
                cue.with_text(attach_speaker_tag(speaker, &translated))
            }
            None => {
                if cue.text.trim().is_empty() {
                    return cue.clone();
                }
                let translated = attempt_chain(&self.chain, &cue.text, target_code)
                    .await
                    .unwrap_or_else(|| cue.text.clone());
                cue.with_text(translated)
            }
        }
    }
}
