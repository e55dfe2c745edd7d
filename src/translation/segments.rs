/*!
 * Conversation segment grouping for context-aware translation.
 *
 * A conversation segment is a maximal run of consecutive cues whose
 * inter-cue gap stays within a configured maximum. Segments let the
 * English-enhancement path translate related dialogue together instead of
 * line by line.
 */

use std::ops::Range;

use crate::subtitle_processor::SubtitleCue;

/// Default maximum gap between cues of one conversation segment
pub const DEFAULT_MAX_GAP_MS: u64 = 3000;

/// Group cues into conversation segments by the gap rule.
///
/// Consecutive cues stay in one segment while the gap between one cue's end
/// and the next cue's start does not exceed `max_gap_ms`. Returns index
/// ranges into the input slice; every cue belongs to exactly one segment.
pub fn group_conversation_segments(cues: &[SubtitleCue], max_gap_ms: u64) -> Vec<Range<usize>> {
    if cues.is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut segment_start = 0;

    for i in 1..cues.len() {
        let gap = cues[i].start_ms.saturating_sub(cues[i - 1].end_ms);
        if gap > max_gap_ms {
            segments.push(segment_start..i);
            segment_start = i;
        }
    }

    segments.push(segment_start..cues.len());
    segments
}
