/*!
 * Tests for structure-preserving translation
 */

use subgen::backends::TranslationBackend;
use subgen::subtitle_processor::{SubtitleCue, SubtitleTrack};
use subgen::translation::CueTranslator;

use crate::common::mock_backends::{FailingBackend, MockBackend, PrefixBackend, SequenceBackend};

fn chain(backends: Vec<Box<dyn TranslationBackend>>) -> CueTranslator {
    CueTranslator::with_chain(backends)
}

/// The canonical speaker-tag property: only the payload is translated
#[tokio::test]
async fn test_translate_withSpeakerTag_shouldTranslateOnlyRemainder() {
    let translator = chain(vec![Box::new(MockBackend::with_dictionary(&[(
        "Hola", "Hello",
    )]))]);
    let cues = vec![SubtitleCue::new(1, 0, 2000, "[Speaker_2] Hola".to_string())];

    let translated = translator.translate_cues(&cues, "Spanish").await;

    assert_eq!(translated.len(), 1);
    assert_eq!(translated[0].text, "[Speaker_2] Hello");
    assert_eq!(translated[0].id, 1);
    assert_eq!(translated[0].start_ms, 0);
    assert_eq!(translated[0].end_ms, 2000);
}

/// Structure preservation when every call fails: timing never changes
#[tokio::test]
async fn test_translate_withAllBackendsFailing_shouldKeepStructureAndText() {
    let translator = chain(vec![Box::new(FailingBackend::new())]);
    let cues = vec![
        SubtitleCue::new(1, 0, 1000, "[Speaker_1] Uno".to_string()),
        SubtitleCue::new(2, 1500, 2500, "Dos".to_string()),
        SubtitleCue::new(3, 3000, 4000, "Tres".to_string()),
    ];

    let translated = translator.translate_cues(&cues, "German").await;

    assert_eq!(translated.len(), cues.len());
    for (original, result) in cues.iter().zip(&translated) {
        assert_eq!(result.id, original.id);
        assert_eq!(result.start_ms, original.start_ms);
        assert_eq!(result.end_ms, original.end_ms);
        // The untranslated original is the failure marker
        assert_eq!(result.text, original.text);
    }
}

/// A tag with an empty remainder is kept without any backend call
#[tokio::test]
async fn test_translate_withTagOnlyCue_shouldSkipBackend() {
    let backend = FailingBackend::new();
    let tracker = backend.tracker();
    let translator = chain(vec![Box::new(backend)]);
    let cues = vec![SubtitleCue::new(1, 0, 1000, "[Speaker_1] ".to_string())];

    let translated = translator.translate_cues(&cues, "Spanish").await;

    assert_eq!(translated[0].text, "[Speaker_1] ");
    assert_eq!(tracker.lock().unwrap().call_count, 0);
}

/// The chain falls through a failing backend to a working one
#[tokio::test]
async fn test_translate_withFailingFirstBackend_shouldUseSecond() {
    let translator = chain(vec![
        Box::new(FailingBackend::new()),
        Box::new(PrefixBackend::new("de:")),
    ]);
    let cues = vec![SubtitleCue::new(1, 0, 1000, "Hallo".to_string())];

    let translated = translator.translate_cues(&cues, "German").await;

    assert_eq!(translated[0].text, "de:Hallo");
}

/// An unchanged response counts as a failed attempt and falls through
#[tokio::test]
async fn test_translate_withUnchangedFirstResponse_shouldFallThrough() {
    // The dictionary mock echoes unknown text unchanged
    let translator = chain(vec![
        Box::new(MockBackend::with_dictionary(&[])),
        Box::new(PrefixBackend::new("x:")),
    ]);
    let cues = vec![SubtitleCue::new(1, 0, 1000, "Bonjour".to_string())];

    let translated = translator.translate_cues(&cues, "French").await;

    assert_eq!(translated[0].text, "x:Bonjour");
}

#[tokio::test]
async fn test_translate_withEmptyInput_shouldReturnEmpty() {
    let translator = chain(vec![Box::new(PrefixBackend::new("x:"))]);

    let translated = translator.translate_cues(&[], "Spanish").await;

    assert!(translated.is_empty());
}

/// English targets batch whole conversation segments into one request
#[tokio::test]
async fn test_translate_toEnglish_withCloseCues_shouldBatchSegment() {
    let translator = chain(vec![Box::new(SequenceBackend::new(&["hello | goodbye"]))]);
    let cues = vec![
        SubtitleCue::new(1, 0, 1000, "hola".to_string()),
        SubtitleCue::new(2, 1500, 2500, "adios".to_string()),
    ];

    let translated = translator.translate_cues(&cues, "English").await;

    assert_eq!(translated.len(), 2);
    assert_eq!(translated[0].text, "Hello.");
    assert_eq!(translated[1].text, "Goodbye.");
    assert_eq!(translated[0].start_ms, 0);
    assert_eq!(translated[1].start_ms, 1500);
}

/// When the batched result cannot be split back, cues translate one by one
#[tokio::test]
async fn test_translate_toEnglish_withUnsplittableBatch_shouldFallBackPerCue() {
    // First reply has no workable separator for a 2-way split; the per-cue
    // fallback then consumes the remaining replies.
    let translator = chain(vec![Box::new(SequenceBackend::new(&[
        "hello and goodbye",
        "hello",
        "Hello. | goodbye",
    ]))]);
    let cues = vec![
        SubtitleCue::new(1, 0, 1000, "hola".to_string()),
        SubtitleCue::new(2, 1500, 2500, "adios".to_string()),
    ];

    let translated = translator.translate_cues(&cues, "English").await;

    assert_eq!(translated[0].text, "Hello.");
    assert_eq!(translated[1].text, "Goodbye.");
}

/// Lone cues carry a rolling window of earlier translations as context
#[tokio::test]
async fn test_translate_toEnglish_withDistantCues_shouldUseRollingContext() {
    let translator = chain(vec![Box::new(SequenceBackend::new(&[
        "hello",
        "Hello. | how are you",
    ]))]);
    // 10s apart: two singleton conversation segments
    let cues = vec![
        SubtitleCue::new(1, 0, 1000, "hola".to_string()),
        SubtitleCue::new(2, 11_000, 12_000, "como estas".to_string()),
    ];

    let translated = translator.translate_cues(&cues, "English").await;

    assert_eq!(translated[0].text, "Hello.");
    assert_eq!(translated[1].text, "How are you.");
}

/// Speaker tags survive the English enhancement path too
#[tokio::test]
async fn test_translate_toEnglish_withSpeakerTags_shouldReattachThem() {
    let translator = chain(vec![Box::new(SequenceBackend::new(&["hello | goodbye"]))]);
    let cues = vec![
        SubtitleCue::new(1, 0, 1000, "[Speaker_1] hola".to_string()),
        SubtitleCue::new(2, 1500, 2500, "[Speaker_2] adios".to_string()),
    ];

    let translated = translator.translate_cues(&cues, "English").await;

    assert_eq!(translated[0].text, "[Speaker_1] Hello.");
    assert_eq!(translated[1].text, "[Speaker_2] Goodbye.");
}

/// Unknown target languages resolve to the default English path
#[tokio::test]
async fn test_translate_withUnknownLanguage_shouldResolveToEnglish() {
    let translator = chain(vec![Box::new(SequenceBackend::new(&["hello"]))]);
    let cues = vec![SubtitleCue::new(1, 0, 1000, "hola".to_string())];

    let translated = translator.translate_cues(&cues, "Klingon").await;

    assert_eq!(translated[0].text, "Hello.");
}

/// Emitting the translated cues keeps the track shape identical
#[tokio::test]
async fn test_translate_thenEmit_shouldKeepTimestampLinesIdentical() {
    let translator = chain(vec![Box::new(PrefixBackend::new("es:"))]);
    let source = SubtitleTrack::new(vec![
        SubtitleCue::new(1, 0, 2000, "One".to_string()),
        SubtitleCue::new(2, 2500, 4500, "Two".to_string()),
    ]);

    let translated = SubtitleTrack::new(translator.translate_cues(&source.cues, "Spanish").await);

    let source_srt = source.to_srt_string();
    let translated_srt = translated.to_srt_string();
    let source_lines: Vec<&str> = source_srt.lines().collect();
    let translated_lines: Vec<&str> = translated_srt.lines().collect();
    assert_eq!(source_lines.len(), translated_lines.len());
    for (src, out) in source_lines.iter().zip(&translated_lines) {
        if src.contains("-->") || src.parse::<usize>().is_ok() {
            assert_eq!(src, out);
        }
    }
}
