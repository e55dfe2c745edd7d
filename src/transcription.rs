/*!
 * Speech-to-text collaborator: transcription data model and HTTP client.
 *
 * The client uploads raw audio bytes to the transcription service and
 * returns a word-level transcript with timestamps and optional speaker
 * diarization. Transport and service failures are surfaced as
 * `UpstreamError` and are never retried here.
 */

use bytes::Bytes;
use log::error;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::UpstreamError;

/// Default service endpoint
const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";

/// Transcription model identifier sent with every request
const MODEL_ID: &str = "scribe_v1";

/// Kind of item in the word stream.
///
/// Only `Word` items carry speech; spacing and audio-event items are
/// skipped by the segmenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordKind {
    Word,
    Spacing,
    AudioEvent,
    #[serde(other)]
    Other,
}

/// A single transcribed word with timing and optional speaker label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    /// The transcribed text
    pub text: String,

    /// Start time in seconds
    #[serde(default)]
    pub start: f64,

    /// End time in seconds; absent values fall back to the start time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,

    /// Item kind
    #[serde(rename = "type")]
    pub kind: WordKind,

    /// Speaker label from diarization, when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_id: Option<String>,
}

impl Word {
    /// Create a speech word with explicit timing and speaker
    pub fn new(text: impl Into<String>, start: f64, end: f64, speaker_id: Option<&str>) -> Self {
        Word {
            text: text.into(),
            start,
            end: Some(end),
            kind: WordKind::Word,
            speaker_id: speaker_id.map(|s| s.to_string()),
        }
    }

    /// End time in seconds, falling back to the start time when absent
    pub fn end_time(&self) -> f64 {
        self.end.unwrap_or(self.start)
    }
}

/// A full transcription result from the speech-to-text service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcription {
    /// Detected or requested language code
    #[serde(default)]
    pub language_code: String,

    /// Confidence of the language detection
    #[serde(default)]
    pub language_probability: f64,

    /// Word-level transcript
    #[serde(default)]
    pub words: Vec<Word>,
}

impl Transcription {
    /// Serialize the transcription as indented structured text.
    ///
    /// This is the raw pass-through export format; no transformation is
    /// applied to the payload.
    pub fn to_pretty_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Count distinct speaker labels in the transcript
    pub fn distinct_speakers(&self) -> usize {
        let mut speakers: Vec<&str> = self
            .words
            .iter()
            .filter_map(|w| w.speaker_id.as_deref())
            .collect();
        speakers.sort_unstable();
        speakers.dedup();
        speakers.len()
    }

    /// Total duration in seconds, taken from the last word's end time
    pub fn duration_seconds(&self) -> f64 {
        self.words.last().map(|w| w.end_time()).unwrap_or(0.0)
    }
}

/// Options for a transcription request
#[derive(Debug, Clone)]
pub struct TranscriptionOptions {
    /// Language of the audio, when known; autodetected otherwise
    pub language_code: Option<String>,

    /// Estimated number of distinct speakers, when known
    pub num_speakers: Option<u32>,

    /// Whether to identify which speaker is talking
    pub diarize: bool,

    /// Whether to tag non-speech events like laughter
    pub tag_audio_events: bool,
}

impl Default for TranscriptionOptions {
    fn default() -> Self {
        Self {
            language_code: None,
            num_speakers: None,
            diarize: true,
            tag_audio_events: true,
        }
    }
}

/// HTTP client for the speech-to-text service
#[derive(Debug, Clone)]
pub struct SpeechToTextClient {
    /// API key for authentication
    api_key: String,
    /// Service base URL
    base_url: String,
    /// HTTP client for making requests
    client: Client,
}

impl SpeechToTextClient {
    /// Create a client against the public service endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint (used by tests)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Transcribe raw audio bytes.
    ///
    /// Failures are hard errors for this request: transport problems map to
    /// `UpstreamError::Transport` and non-2xx responses to
    /// `UpstreamError::Rejected`.
    pub async fn transcribe(
        &self,
        audio: Bytes,
        options: &TranscriptionOptions,
    ) -> Result<Transcription, UpstreamError> {
        let url = format!("{}/v1/speech-to-text", self.base_url);

        let file_part = Part::bytes(audio.to_vec())
            .file_name("audio.mp3")
            .mime_str("audio/mp3")
            .map_err(|e| UpstreamError::Transport(format!("Failed to build upload: {}", e)))?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("model_id", MODEL_ID)
            .text("diarize", options.diarize.to_string())
            .text("tag_audio_events", options.tag_audio_events.to_string());

        if let Some(code) = &options.language_code {
            form = form.text("language_code", code.clone());
        }
        if let Some(num) = options.num_speakers {
            form = form.text("num_speakers", num.to_string());
        }

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header("Accept", "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Transcription service error ({}): {}", status, message);
            return Err(UpstreamError::Rejected {
                status_code: status.as_u16(),
                message,
            });
        }

        response
            .json::<Transcription>()
            .await
            .map_err(|e| UpstreamError::Transport(format!("Failed to parse transcription response: {}", e)))
    }
}
