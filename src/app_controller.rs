use anyhow::{Result, anyhow};
use bytes::Bytes;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::backends::BackendCredential;
use crate::file_utils::FileManager;
use crate::media;
use crate::segmenter::Segmenter;
use crate::subtitle_processor::SubtitleTrack;
use crate::transcription::{SpeechToTextClient, Transcription, TranscriptionOptions};
use crate::translation::{LanguageOutcome, LanguageResult, MultiLanguageTranslator};

// @module: Application controller for subtitle generation and translation

/// Artifacts produced by one generation run
pub struct GenerationOutput {
    /// Raw transcription result
    pub transcription: Transcription,

    /// Segmented cue sequence
    pub track: SubtitleTrack,

    /// SRT rendering
    pub srt: String,

    /// WebVTT rendering
    pub vtt: String,
}

/// Main application controller for the subtitle pipelines
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Access the active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generate subtitle tracks from raw media bytes.
    ///
    /// When `extract_audio_first` is set, the bytes are run through ffmpeg
    /// to pull out an audio stream; extraction failures degrade to the
    /// original bytes. Transcription failures are hard errors for this
    /// request.
    pub async fn generate_subtitles(
        &self,
        media_bytes: Bytes,
        api_key: &str,
        options: &TranscriptionOptions,
        extract_audio_first: bool,
    ) -> Result<GenerationOutput> {
        if api_key.trim().is_empty() {
            return Err(anyhow!("A transcription API key is required"));
        }

        let audio = if extract_audio_first {
            info!("Extracting audio from media ({} bytes)", media_bytes.len());
            media::extract_audio(media_bytes).await
        } else {
            media_bytes
        };

        let client = SpeechToTextClient::new(api_key);
        let transcription = client.transcribe(audio, options).await?;

        info!(
            "Transcription complete: language {} ({:.0}% confidence), {} speaker(s), {:.1}s",
            transcription.language_code,
            transcription.language_probability * 100.0,
            transcription.distinct_speakers(),
            transcription.duration_seconds()
        );

        let segmenter = Segmenter::new(self.config.segmentation.to_segmenter_config());
        let track = segmenter.segment(&transcription.words);
        info!("Segmented {} words into {} cues", transcription.words.len(), track.len());

        let srt = track.to_srt_string();
        let vtt = track.to_vtt_string();

        Ok(GenerationOutput {
            transcription,
            track,
            srt,
            vtt,
        })
    }

    /// Translate a parsed track into every requested language.
    ///
    /// Returns one result per language; failed languages are reported, not
    /// raised. Configuration problems (unknown service, missing credential)
    /// are raised before any job starts.
    pub async fn translate_track(
        &self,
        source: &SubtitleTrack,
        languages: &[String],
        credential: Option<BackendCredential>,
    ) -> Result<Vec<LanguageResult>> {
        if source.is_empty() {
            return Err(anyhow!("No cues to translate"));
        }
        if languages.is_empty() {
            return Ok(Vec::new());
        }

        let credential = credential.or_else(|| self.config.translation.credential());
        let translator = MultiLanguageTranslator::new(
            self.config.translation.service.clone(),
            credential,
            self.config.translation.concurrent_languages,
        )
        .with_conversation_gap_ms(self.config.translation.conversation_gap_ms());

        let progress = ProgressBar::new(languages.len() as u64);
        progress.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} languages",
            )?
            .progress_chars("#>-"),
        );

        let bar = progress.clone();
        let results = translator
            .translate_all(source, languages, move |done, _total| {
                bar.set_position(done as u64);
            })
            .await?;
        progress.finish_and_clear();

        for result in &results {
            match &result.outcome {
                LanguageOutcome::Succeeded { track, .. } => {
                    info!("{}: translated {} cues", result.language, track.len());
                }
                LanguageOutcome::Failed { reason } => {
                    warn!("{}: {}", result.language, reason);
                }
            }
        }

        Ok(results)
    }

    /// Write generation artifacts next to the input file.
    ///
    /// Returns the paths written, in emission order.
    pub fn write_generation_outputs(
        &self,
        input_path: &Path,
        output: &GenerationOutput,
        emit_srt: bool,
        emit_vtt: bool,
        emit_json: bool,
    ) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        if emit_srt {
            let path = FileManager::output_path(input_path, None, "srt");
            FileManager::write_string(&path, &output.srt)?;
            written.push(path);
        }
        if emit_vtt {
            let path = FileManager::output_path(input_path, None, "vtt");
            FileManager::write_string(&path, &output.vtt)?;
            written.push(path);
        }
        if emit_json {
            let path = FileManager::output_path(input_path, None, "json");
            FileManager::write_string(&path, &output.transcription.to_pretty_json()?)?;
            written.push(path);
        }

        Ok(written)
    }

    /// Write translated tracks next to the input file, one SRT and one VTT
    /// per successful language.
    pub fn write_translation_outputs(
        &self,
        input_path: &Path,
        results: &[LanguageResult],
    ) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        for result in results {
            if let LanguageOutcome::Succeeded { srt, vtt, .. } = &result.outcome {
                let srt_path = FileManager::output_path(input_path, Some(&result.code), "srt");
                FileManager::write_string(&srt_path, srt)?;
                written.push(srt_path);

                let vtt_path = FileManager::output_path(input_path, Some(&result.code), "vtt");
                FileManager::write_string(&vtt_path, vtt)?;
                written.push(vtt_path);
            }
        }

        Ok(written)
    }
}
