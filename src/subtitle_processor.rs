use std::fmt;
use once_cell::sync::Lazy;
use regex::Regex;
use log::warn;

use crate::errors::SubtitleError;

// @module: Subtitle cue model, timestamp codec, emitters and parser

// @const: Leading speaker tag of the exact form "[id] "
static SPEAKER_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\[([^\]]+)\] (.*)$").unwrap()
});

/// Textual timestamp style used by the two subtitle formats.
///
/// SRT separates milliseconds with a comma, WebVTT with a dot. Everything
/// else about the two renderings is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampStyle {
    /// HH:MM:SS,mmm
    Srt,
    /// HH:MM:SS.mmm
    Vtt,
}

impl TimestampStyle {
    fn millis_separator(&self) -> char {
        match self {
            Self::Srt => ',',
            Self::Vtt => '.',
        }
    }
}

/// Convert float seconds to whole milliseconds, truncating the fraction.
pub fn seconds_to_ms(seconds: f64) -> u64 {
    (seconds * 1000.0) as u64
}

/// Format a timestamp in milliseconds to textual form.
///
/// Hours are unbounded: a track longer than a day renders three-digit hours
/// rather than wrapping.
pub fn format_timestamp(ms: u64, style: TimestampStyle) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours,
        minutes,
        seconds,
        style.millis_separator(),
        millis
    )
}

/// Parse an SRT timestamp (HH:MM:SS,mmm) to milliseconds.
///
/// The comma form is the only accepted structure: exactly one comma and
/// exactly three colon-separated integer time fields.
pub fn parse_timestamp(text: &str) -> Result<u64, SubtitleError> {
    let trimmed = text.trim();
    let bad = || SubtitleError::Timestamp(trimmed.to_string());

    let (time_part, ms_part) = trimmed.split_once(',').ok_or_else(|| bad())?;
    let millis: u64 = ms_part.parse().map_err(|_| bad())?;

    let mut fields = time_part.split(':');
    match (fields.next(), fields.next(), fields.next(), fields.next()) {
        (Some(h), Some(m), Some(s), None) => {
            let hours: u64 = h.parse().map_err(|_| bad())?;
            let minutes: u64 = m.parse().map_err(|_| bad())?;
            let seconds: u64 = s.parse().map_err(|_| bad())?;
            Ok((hours * 3600 + minutes * 60 + seconds) * 1000 + millis)
        }
        _ => Err(bad()),
    }
}

/// Parse a "start --> end" timestamp line into a millisecond pair.
pub fn parse_timestamp_range(line: &str) -> Result<(u64, u64), SubtitleError> {
    let (start, end) = line
        .split_once("-->")
        .ok_or_else(|| SubtitleError::Timestamp(line.trim().to_string()))?;
    Ok((parse_timestamp(start)?, parse_timestamp(end)?))
}

/// Split a leading speaker tag off a cue text.
///
/// Returns the speaker id (without brackets) and the remainder after the
/// single separating space. The remainder may be empty.
pub fn split_speaker_tag(text: &str) -> Option<(&str, &str)> {
    let caps = SPEAKER_TAG_REGEX.captures(text)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Attach a speaker tag prefix to a text.
pub fn attach_speaker_tag(speaker: &str, text: &str) -> String {
    format!("[{}] {}", speaker, text)
}

// @struct: Single subtitle cue
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleCue {
    // @field: 1-based cue id
    pub id: usize,

    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,

    // @field: Cue text, possibly with a leading speaker tag and newlines
    pub text: String,
}

impl SubtitleCue {
    /// Create a new cue
    pub fn new(id: usize, start_ms: u64, end_ms: u64, text: String) -> Self {
        SubtitleCue {
            id,
            start_ms,
            end_ms,
            text,
        }
    }

    /// Create a cue from float-second boundaries, truncating to milliseconds
    pub fn from_seconds(id: usize, start_secs: f64, end_secs: f64, text: String) -> Self {
        Self::new(id, seconds_to_ms(start_secs), seconds_to_ms(end_secs), text)
    }

    /// Start time in seconds
    pub fn start_seconds(&self) -> f64 {
        self.start_ms as f64 / 1000.0
    }

    /// End time in seconds
    pub fn end_seconds(&self) -> f64 {
        self.end_ms as f64 / 1000.0
    }

    /// Produce a copy with the same id and timing but different text.
    ///
    /// This is the only way translation stages build their output, so cue
    /// structure cannot drift.
    pub fn with_text(&self, text: String) -> Self {
        SubtitleCue {
            id: self.id,
            start_ms: self.start_ms,
            end_ms: self.end_ms,
            text,
        }
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        format_timestamp(self.start_ms, TimestampStyle::Srt)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        format_timestamp(self.end_ms, TimestampStyle::Srt)
    }
}

impl fmt::Display for SubtitleCue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.id)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// An ordered sequence of subtitle cues
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubtitleTrack {
    /// List of cues in display order
    pub cues: Vec<SubtitleCue>,
}

impl SubtitleTrack {
    /// Create a track from a cue sequence
    pub fn new(cues: Vec<SubtitleCue>) -> Self {
        SubtitleTrack { cues }
    }

    /// Number of cues in the track
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Whether the track has no cues
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Render the track as SRT text.
    ///
    /// An empty track renders as the empty string.
    pub fn to_srt_string(&self) -> String {
        let mut out = String::new();
        for cue in &self.cues {
            out.push_str(&cue.to_string());
        }
        out
    }

    /// Render the track as WebVTT text.
    ///
    /// WebVTT is a strict textual variant of SRT for our purposes: the SRT
    /// rendering is reused with the millisecond separator swapped on
    /// timestamp lines only, under a fixed header.
    pub fn to_vtt_string(&self) -> String {
        let srt = self.to_srt_string();
        if srt.is_empty() {
            return String::new();
        }

        let mut vtt = String::from("WEBVTT\n\n");
        for line in srt.trim_end().split('\n') {
            if line.contains("-->") {
                vtt.push_str(&line.replace(',', "."));
            } else {
                vtt.push_str(line);
            }
            vtt.push('\n');
        }
        vtt
    }

    /// Parse SRT text into a track.
    ///
    /// Parsing is deliberately lenient: the input is split on blank-line
    /// boundaries and each block must carry at least three non-empty lines
    /// (id, timestamp range, text). Malformed blocks are skipped so that
    /// partial or corrupt input degrades to fewer recovered cues instead of
    /// failing the whole parse. Embedded ids are kept exactly as read, never
    /// renumbered.
    pub fn parse_srt_string(content: &str) -> Self {
        let normalized = content.replace("\r\n", "\n");
        let mut cues = Vec::new();

        for block in normalized.split("\n\n") {
            let trimmed = block.trim();
            if trimmed.is_empty() {
                continue;
            }

            let lines: Vec<&str> = trimmed.split('\n').collect();
            if lines.len() < 3 {
                warn!("Skipping cue block with only {} line(s)", lines.len());
                continue;
            }

            let id: usize = match lines[0].trim().parse() {
                Ok(id) => id,
                Err(_) => {
                    warn!("Skipping cue block with non-numeric id: {}", lines[0]);
                    continue;
                }
            };

            let (start_ms, end_ms) = match parse_timestamp_range(lines[1]) {
                Ok(range) => range,
                Err(e) => {
                    warn!("Skipping cue block {}: {}", id, e);
                    continue;
                }
            };

            let text = lines[2..].join("\n");
            cues.push(SubtitleCue::new(id, start_ms, end_ms, text));
        }

        SubtitleTrack::new(cues)
    }
}

impl fmt::Display for SubtitleTrack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_srt_string())
    }
}
