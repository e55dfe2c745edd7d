/*!
 * Multi-language translation orchestration.
 *
 * Each target language is an independent job: a pure function of the source
 * cues and the language, with no shared mutable state. Jobs run
 * concurrently under a semaphore bound and a failed language never aborts
 * its siblings; callers get one result per requested language, in request
 * order.
 */

use futures::stream::{self, StreamExt};
use log::{info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;

use crate::backends::{BackendCredential, BackendKind, build_chain};
use crate::errors::ConfigError;
use crate::language_utils::resolve_target_code;
use crate::subtitle_processor::{SubtitleCue, SubtitleTrack};

use super::core::CueTranslator;
use super::segments::DEFAULT_MAX_GAP_MS;

/// Lifecycle of one per-language translation job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationJobState {
    /// Not yet submitted
    Idle,
    /// Currently translating
    Translating,
    /// Finished with a changed track
    Succeeded,
    /// Finished without a usable translation
    Failed,
}

/// Outcome of one language job
#[derive(Debug, Clone)]
pub enum LanguageOutcome {
    /// The language produced a changed track
    Succeeded {
        /// Translated cue sequence
        track: SubtitleTrack,
        /// SRT rendering
        srt: String,
        /// WebVTT rendering
        vtt: String,
    },
    /// The language produced nothing usable
    Failed {
        /// Human-readable failure reason
        reason: String,
    },
}

/// Result of one requested target language
#[derive(Debug, Clone)]
pub struct LanguageResult {
    /// The language as requested by the caller
    pub language: String,
    /// Resolved backend code
    pub code: String,
    /// Job outcome
    pub outcome: LanguageOutcome,
}

impl LanguageResult {
    /// Terminal job state for this result
    pub fn state(&self) -> TranslationJobState {
        match self.outcome {
            LanguageOutcome::Succeeded { .. } => TranslationJobState::Succeeded,
            LanguageOutcome::Failed { .. } => TranslationJobState::Failed,
        }
    }

    /// Whether the job produced a usable translation
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, LanguageOutcome::Succeeded { .. })
    }
}

/// Orchestrates concurrent per-language translation jobs
pub struct MultiLanguageTranslator {
    /// Selected translation service
    kind: BackendKind,

    /// Credential for services that mandate one
    credential: Option<BackendCredential>,

    /// Maximum number of languages translated at once
    max_concurrent_languages: usize,

    /// Conversation segment gap threshold in milliseconds
    conversation_gap_ms: u64,
}

impl MultiLanguageTranslator {
    /// Create an orchestrator for a service selector
    pub fn new(
        kind: BackendKind,
        credential: Option<BackendCredential>,
        max_concurrent_languages: usize,
    ) -> Self {
        Self {
            kind,
            credential,
            max_concurrent_languages: max_concurrent_languages.max(1),
            conversation_gap_ms: DEFAULT_MAX_GAP_MS,
        }
    }

    /// Override the conversation segment gap threshold
    pub fn with_conversation_gap_ms(mut self, conversation_gap_ms: u64) -> Self {
        self.conversation_gap_ms = conversation_gap_ms;
        self
    }

    /// Translate a source track into every requested language.
    ///
    /// Configuration problems (unknown service, missing credential) surface
    /// here, before any job is submitted. Per-language failures do not:
    /// they come back as `Failed` results alongside their successful
    /// siblings.
    pub async fn translate_all(
        &self,
        source: &SubtitleTrack,
        languages: &[String],
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Result<Vec<LanguageResult>, ConfigError> {
        build_chain(&self.kind, self.credential.as_ref())?;

        let kind = self.kind.clone();
        let credential = self.credential.clone();
        let gap_ms = self.conversation_gap_ms;
        let factory = move || {
            CueTranslator::new(&kind, credential.as_ref())
                .map(|t| t.with_conversation_gap_ms(gap_ms))
        };

        Ok(self
            .translate_all_with(source, languages, factory, progress_callback)
            .await)
    }

    /// Translate with an explicit translator factory.
    ///
    /// The factory builds one translator per language job; tests inject
    /// mock backend chains through it.
    pub async fn translate_all_with<F>(
        &self,
        source: &SubtitleTrack,
        languages: &[String],
        factory: F,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Vec<LanguageResult>
    where
        F: Fn() -> Result<CueTranslator, ConfigError> + Clone + Send + Sync + 'static,
    {
        if languages.is_empty() {
            return Vec::new();
        }

        let source_srt = source.to_srt_string();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_languages));
        let total = languages.len();
        let completed = Arc::new(AtomicUsize::new(0));

        let results = stream::iter(languages.iter().cloned().enumerate())
            .map(|(index, language)| {
                let cues = source.cues.clone();
                let source_srt = source_srt.clone();
                let semaphore = semaphore.clone();
                let completed = completed.clone();
                let progress_callback = progress_callback.clone();
                let factory = factory.clone();

                async move {
                    // Acquire a permit from the semaphore
                    let _permit = semaphore.acquire().await.unwrap();

                    let outcome = run_language_job(&cues, &source_srt, &language, factory).await;

                    let current = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total);

                    (index, language, outcome)
                }
            })
            .buffer_unordered(self.max_concurrent_languages)
            .collect::<Vec<_>>()
            .await;

        // Restore request order
        let mut sorted = results;
        sorted.sort_by_key(|(index, _, _)| *index);

        sorted
            .into_iter()
            .map(|(_, language, outcome)| {
                let code = resolve_target_code(&language).to_string();
                LanguageResult {
                    language,
                    code,
                    outcome,
                }
            })
            .collect()
    }
}

/// Run one language job to completion
async fn run_language_job<F>(
    cues: &[SubtitleCue],
    source_srt: &str,
    language: &str,
    factory: F,
) -> LanguageOutcome
where
    F: Fn() -> Result<CueTranslator, ConfigError>,
{
    let translator = match factory() {
        Ok(translator) => translator,
        Err(e) => {
            return LanguageOutcome::Failed {
                reason: e.to_string(),
            };
        }
    };

    let translated = translator.translate_cues(cues, language).await;
    let track = SubtitleTrack::new(translated);
    let srt = track.to_srt_string();

    // A track identical to the source means every cue fell back to its
    // original text; that language is failed, not silently "translated".
    if srt.is_empty() || srt == source_srt {
        warn!("Translation to {} produced no changes", language);
        LanguageOutcome::Failed {
            reason: format!("translation produced no changes for {}", language),
        }
    } else {
        info!("Translated {} cues to {}", track.len(), language);
        let vtt = track.to_vtt_string();
        LanguageOutcome::Succeeded { track, srt, vtt }
    }
}
