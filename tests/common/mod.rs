/*!
 * Common test utilities for the subgen test suite
 */


use subgen::subtitle_processor::{SubtitleCue, SubtitleTrack};
use subgen::transcription::Word;

/// Initialize logging for tests; safe to call more than once
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Build a word sequence with one word per (text, start, end, speaker) tuple
pub fn words(entries: &[(&str, f64, f64, Option<&str>)]) -> Vec<Word> {
    entries
        .iter()
        .map(|(text, start, end, speaker)| Word::new(*text, *start, *end, *speaker))
        .collect()
}

/// Build a small track with two speaker-tagged cues
pub fn sample_track() -> SubtitleTrack {
    SubtitleTrack::new(vec![
        SubtitleCue::new(1, 0, 2000, "[Speaker_1] Hola".to_string()),
        SubtitleCue::new(2, 2500, 4500, "[Speaker_2] Adios".to_string()),
    ])
}
