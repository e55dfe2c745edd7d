/*!
 * Segmenter: groups a word-level transcript into subtitle cues.
 *
 * Words are consumed in transcript order and collected into an open
 * accumulator that is closed whenever a word-count, duration, or
 * speaker-change limit is hit. Cue ids are assigned sequentially from 1 in
 * emission order.
 */

use crate::subtitle_processor::{SubtitleCue, SubtitleTrack, attach_speaker_tag};
use crate::transcription::{Word, WordKind};

/// Speaker label assumed for words that carry no diarization label
pub const DEFAULT_SPEAKER: &str = "speaker_0";

/// Limits controlling when an open cue accumulator is closed
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Maximum cue duration in seconds, measured from the first word's start
    pub max_segment_duration_secs: f64,

    /// Maximum number of words per cue
    pub max_words_per_segment: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            max_segment_duration_secs: 5.0,
            max_words_per_segment: 8,
        }
    }
}

/// Open cue accumulator while iterating the word stream
struct Accumulator {
    start_secs: f64,
    end_secs: f64,
    speaker: String,
    words: Vec<String>,
    // The break rule should make mixed-speaker accumulators impossible;
    // tracked anyway so a tagging bug cannot silently drop attribution.
    mixed_speakers: bool,
}

impl Accumulator {
    fn open(word: &Word, speaker: &str) -> Self {
        Accumulator {
            start_secs: word.start,
            end_secs: word.end_time(),
            speaker: speaker.to_string(),
            words: vec![word.text.clone()],
            mixed_speakers: false,
        }
    }

    fn push(&mut self, word: &Word, speaker: &str) {
        if speaker != self.speaker {
            self.mixed_speakers = true;
        }
        self.words.push(word.text.clone());
        self.end_secs = word.end_time();
    }

    fn close(self, id: usize) -> SubtitleCue {
        let joined = self.words.join(" ");
        let text = if self.mixed_speakers || self.speaker != DEFAULT_SPEAKER {
            attach_speaker_tag(&self.speaker, &joined)
        } else {
            joined
        };
        SubtitleCue::from_seconds(id, self.start_secs, self.end_secs, text)
    }
}

/// Groups timestamped words into subtitle cues
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    config: SegmenterConfig,
}

impl Segmenter {
    /// Create a segmenter with the given limits
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    /// Create a segmenter with default limits
    pub fn with_defaults() -> Self {
        Self::new(SegmenterConfig::default())
    }

    /// Group a word sequence into a subtitle track.
    ///
    /// The input is assumed time-ordered and is not reordered. Items whose
    /// kind is not `Word` are skipped. An empty or wordless transcript
    /// yields an empty track.
    pub fn segment(&self, words: &[Word]) -> SubtitleTrack {
        let mut cues: Vec<SubtitleCue> = Vec::new();
        let mut acc: Option<Accumulator> = None;

        for word in words {
            if word.kind != WordKind::Word {
                continue;
            }

            let speaker = word.speaker_id.as_deref().unwrap_or(DEFAULT_SPEAKER);

            let open_new = match &acc {
                None => true,
                Some(current) => {
                    current.words.len() >= self.config.max_words_per_segment
                        || (word.start - current.start_secs) > self.config.max_segment_duration_secs
                        || current.speaker != speaker
                }
            };

            if open_new {
                if let Some(done) = acc.take() {
                    cues.push(done.close(cues.len() + 1));
                }
                acc = Some(Accumulator::open(word, speaker));
            } else if let Some(current) = acc.as_mut() {
                current.push(word, speaker);
            }
        }

        // Flush the trailing accumulator
        if let Some(done) = acc.take() {
            cues.push(done.close(cues.len() + 1));
        }

        SubtitleTrack::new(cues)
    }
}
