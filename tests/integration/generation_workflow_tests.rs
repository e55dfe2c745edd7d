/*!
 * End-to-end generation pipeline tests: words through segmentation,
 * emission, and reparsing. No network involved.
 */

use subgen::segmenter::Segmenter;
use subgen::subtitle_processor::SubtitleTrack;

use crate::common::words;

#[test]
fn test_generationPipeline_withDialogue_shouldSurviveEmitAndReparse() {
    let input = words(&[
        ("Good", 0.0, 0.2, Some("speaker_0")),
        ("morning", 0.3, 0.6, Some("speaker_0")),
        ("everyone", 0.7, 1.1, Some("speaker_0")),
        ("Thanks", 1.5, 1.8, Some("speaker_1")),
        ("for", 1.9, 2.0, Some("speaker_1")),
        ("coming", 2.1, 2.4, Some("speaker_1")),
    ]);

    let track = Segmenter::with_defaults().segment(&input);

    assert_eq!(track.len(), 2);
    assert_eq!(track.cues[0].text, "Good morning everyone");
    assert_eq!(track.cues[1].text, "[speaker_1] Thanks for coming");

    let reparsed = SubtitleTrack::parse_srt_string(&track.to_srt_string());
    assert_eq!(reparsed, track);
}

#[test]
fn test_generationPipeline_withEmptyTranscript_shouldEmitEmptyArtifacts() {
    let track = Segmenter::with_defaults().segment(&[]);

    assert_eq!(track.to_srt_string(), "");
    assert_eq!(track.to_vtt_string(), "");
}

#[test]
fn test_generationPipeline_vttDerivation_shouldMirrorSrtContent() {
    let input = words(&[
        ("Uno", 0.0, 0.4, Some("speaker_2")),
        ("dos", 0.5, 0.9, Some("speaker_2")),
    ]);

    let track = Segmenter::with_defaults().segment(&input);
    let srt = track.to_srt_string();
    let vtt = track.to_vtt_string();

    assert!(vtt.starts_with("WEBVTT\n\n"));
    assert!(srt.contains("00:00:00,000 --> 00:00:00,900"));
    assert!(vtt.contains("00:00:00.000 --> 00:00:00.900"));
    // The cue text, speaker tag included, is byte-identical in both
    assert!(srt.contains("[speaker_2] Uno dos"));
    assert!(vtt.contains("[speaker_2] Uno dos"));
}

#[test]
fn test_generationPipeline_withLongMonologue_shouldChunkByWordLimit() {
    let input: Vec<_> = (0..25)
        .map(|i| {
            let start = i as f64 * 0.3;
            (format!("word{}", i), start, start + 0.2)
        })
        .collect();
    let input = words(
        &input
            .iter()
            .map(|(text, start, end)| (text.as_str(), *start, *end, None))
            .collect::<Vec<_>>(),
    );

    let track = Segmenter::with_defaults().segment(&input);

    // 25 words at 8 words per cue
    assert_eq!(track.len(), 4);
    let total: usize = track
        .cues
        .iter()
        .map(|c| c.text.split_whitespace().count())
        .sum();
    assert_eq!(total, 25);

    // Ids are contiguous and timing is non-decreasing
    for (i, cue) in track.cues.iter().enumerate() {
        assert_eq!(cue.id, i + 1);
        if i > 0 {
            assert!(cue.start_ms >= track.cues[i - 1].start_ms);
        }
    }
}
