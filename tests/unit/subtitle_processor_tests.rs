/*!
 * Tests for the timestamp codec, emitters, and cue parser
 */

use std::fmt::Write;

use subgen::subtitle_processor::{
    SubtitleCue, SubtitleTrack, TimestampStyle, format_timestamp, parse_timestamp,
    parse_timestamp_range, seconds_to_ms, split_speaker_tag,
};

/// Test timestamp parsing and formatting
#[test]
fn test_timestamp_parsing_withValidTimestamp_shouldParseAndFormat() {
    let ts = "01:23:45,678";
    let ms = parse_timestamp(ts).unwrap();
    assert_eq!(ms, 5_025_678);

    let formatted = format_timestamp(ms, TimestampStyle::Srt);
    assert_eq!(formatted, ts);
}

#[test]
fn test_timestamp_formatting_withVttStyle_shouldUseDotSeparator() {
    assert_eq!(format_timestamp(5_025_678, TimestampStyle::Vtt), "01:23:45.678");
}

#[test]
fn test_timestamp_formatting_withOverOneDay_shouldNotWrapHours() {
    // 26 hours; hours are unbounded, not capped at 24
    let ms = 26 * 3_600_000;
    assert_eq!(format_timestamp(ms, TimestampStyle::Srt), "26:00:00,000");
}

#[test]
fn test_seconds_to_ms_withFraction_shouldTruncateNotRound() {
    assert_eq!(seconds_to_ms(1.9999), 1999);
    assert_eq!(seconds_to_ms(0.0005), 0);
}

#[test]
fn test_timestamp_roundTrip_shouldStayWithinOneMillisecond() {
    for &t in &[0.0, 0.5, 1.234, 59.999, 3600.0, 7325.678] {
        let ms = seconds_to_ms(t);
        let text = format_timestamp(ms, TimestampStyle::Srt);
        let parsed = parse_timestamp(&text).unwrap();
        let back = parsed as f64 / 1000.0;
        assert!((back - t).abs() < 0.001, "round trip drifted for {}", t);
    }
}

#[test]
fn test_timestamp_parsing_withDotSeparator_shouldFail() {
    assert!(parse_timestamp("01:23:45.678").is_err());
}

#[test]
fn test_timestamp_parsing_withMissingField_shouldFail() {
    assert!(parse_timestamp("23:45,678").is_err());
    assert!(parse_timestamp("01:02:23:45,678").is_err());
    assert!(parse_timestamp("no timestamp").is_err());
}

#[test]
fn test_timestamp_range_withValidLine_shouldParseBothEnds() {
    let (start, end) = parse_timestamp_range("00:00:01,000 --> 00:00:04,500").unwrap();
    assert_eq!(start, 1000);
    assert_eq!(end, 4500);
}

#[test]
fn test_timestamp_range_withoutArrow_shouldFail() {
    assert!(parse_timestamp_range("00:00:01,000 00:00:04,500").is_err());
}

/// Test cue display formatting
#[test]
fn test_cue_display_withValidCue_shouldFormatAsBlock() {
    let cue = SubtitleCue::new(1, 5000, 10000, "Test subtitle".to_string());
    let mut output = String::new();
    write!(output, "{}", cue).unwrap();

    assert_eq!(output, "1\n00:00:05,000 --> 00:00:10,000\nTest subtitle\n\n");
}

#[test]
fn test_cue_withText_shouldPreserveIdAndTiming() {
    let cue = SubtitleCue::new(7, 100, 900, "original".to_string());
    let translated = cue.with_text("translated".to_string());

    assert_eq!(translated.id, 7);
    assert_eq!(translated.start_ms, 100);
    assert_eq!(translated.end_ms, 900);
    assert_eq!(translated.text, "translated");
}

#[test]
fn test_split_speaker_tag_withTaggedText_shouldSplit() {
    let (speaker, remainder) = split_speaker_tag("[Speaker_2] Hola").unwrap();
    assert_eq!(speaker, "Speaker_2");
    assert_eq!(remainder, "Hola");
}

#[test]
fn test_split_speaker_tag_withMultilineRemainder_shouldKeepNewlines() {
    let (speaker, remainder) = split_speaker_tag("[s1] first\nsecond").unwrap();
    assert_eq!(speaker, "s1");
    assert_eq!(remainder, "first\nsecond");
}

#[test]
fn test_split_speaker_tag_withoutTag_shouldReturnNone() {
    assert!(split_speaker_tag("No tag here").is_none());
    // Bracket text without the trailing space is not a well-formed tag
    assert!(split_speaker_tag("[Speaker_2]Hola").is_none());
}

#[test]
fn test_split_speaker_tag_withEmptyRemainder_shouldReturnEmpty() {
    let (speaker, remainder) = split_speaker_tag("[Speaker_1] ").unwrap();
    assert_eq!(speaker, "Speaker_1");
    assert_eq!(remainder, "");
}

/// Test SRT emission
#[test]
fn test_to_srt_string_withEmptyTrack_shouldBeEmptyString() {
    assert_eq!(SubtitleTrack::default().to_srt_string(), "");
}

#[test]
fn test_to_srt_string_withTwoCues_shouldEmitNumberedBlocks() {
    let track = SubtitleTrack::new(vec![
        SubtitleCue::new(1, 0, 2000, "First".to_string()),
        SubtitleCue::new(2, 2500, 4000, "Second".to_string()),
    ]);

    let srt = track.to_srt_string();
    assert_eq!(
        srt,
        "1\n00:00:00,000 --> 00:00:02,000\nFirst\n\n2\n00:00:02,500 --> 00:00:04,000\nSecond\n\n"
    );
}

/// Test VTT derivation
#[test]
fn test_to_vtt_string_withEmptyTrack_shouldBeEmptyString() {
    assert_eq!(SubtitleTrack::default().to_vtt_string(), "");
}

#[test]
fn test_to_vtt_string_shouldSwapSeparatorOnlyOnTimestampLines() {
    let track = SubtitleTrack::new(vec![SubtitleCue::new(
        1,
        0,
        2000,
        "Wait, what?".to_string(),
    )]);

    let vtt = track.to_vtt_string();
    assert!(vtt.starts_with("WEBVTT\n\n"));
    assert!(vtt.contains("00:00:00.000 --> 00:00:02.000"));
    // The comma inside the cue text must survive
    assert!(vtt.contains("Wait, what?"));
}

/// Test parsing SRT string content
#[test]
fn test_parse_srt_string_withValidContent_shouldParseCorrectly() {
    let srt_content = "1\n00:00:01,000 --> 00:00:04,000\nHello world\n\n2\n00:00:05,000 --> 00:00:08,000\nTest subtitle\nSecond line\n\n";

    let track = SubtitleTrack::parse_srt_string(srt_content);

    assert_eq!(track.len(), 2);

    assert_eq!(track.cues[0].id, 1);
    assert_eq!(track.cues[0].start_ms, 1000);
    assert_eq!(track.cues[0].end_ms, 4000);
    assert_eq!(track.cues[0].text, "Hello world");

    assert_eq!(track.cues[1].id, 2);
    assert_eq!(track.cues[1].start_ms, 5000);
    assert_eq!(track.cues[1].end_ms, 8000);
    assert_eq!(track.cues[1].text, "Test subtitle\nSecond line");
}

#[test]
fn test_parse_srt_string_withCrlfLineEndings_shouldParse() {
    let srt_content = "1\r\n00:00:01,000 --> 00:00:02,000\r\nHello\r\n\r\n";

    let track = SubtitleTrack::parse_srt_string(srt_content);

    assert_eq!(track.len(), 1);
    assert_eq!(track.cues[0].text, "Hello");
}

#[test]
fn test_parse_srt_string_withMalformedBlock_shouldSkipItSilently() {
    // The middle block has only two lines and must be dropped; the valid
    // blocks keep their own embedded ids, no renumbering.
    let srt_content = "3\n00:00:01,000 --> 00:00:02,000\nFirst\n\n99\n00:00:03,000\n\n7\n00:00:05,000 --> 00:00:06,000\nLast\n\n";

    let track = SubtitleTrack::parse_srt_string(srt_content);

    assert_eq!(track.len(), 2);
    assert_eq!(track.cues[0].id, 3);
    assert_eq!(track.cues[1].id, 7);
}

#[test]
fn test_parse_srt_string_withNonNumericId_shouldSkipBlock() {
    let srt_content = "abc\n00:00:01,000 --> 00:00:02,000\nBad id\n\n1\n00:00:03,000 --> 00:00:04,000\nGood\n\n";

    let track = SubtitleTrack::parse_srt_string(srt_content);

    assert_eq!(track.len(), 1);
    assert_eq!(track.cues[0].text, "Good");
}

#[test]
fn test_parse_srt_string_withOnlyGarbage_shouldReturnEmptyTrack() {
    let track = SubtitleTrack::parse_srt_string("not a subtitle file at all");
    assert!(track.is_empty());
}

/// Round-trip property: parse(emit(cues)) == cues
#[test]
fn test_roundTrip_withSpeakerTagsAndNewlines_shouldBeLossless() {
    let track = SubtitleTrack::new(vec![
        SubtitleCue::new(1, 0, 1500, "[Speaker_1] Hello there".to_string()),
        SubtitleCue::new(2, 2000, 3500, "Plain line\nwith a second line".to_string()),
        SubtitleCue::new(3, 4000, 5000, "[Speaker_2] Goodbye".to_string()),
    ]);

    let reparsed = SubtitleTrack::parse_srt_string(&track.to_srt_string());

    assert_eq!(reparsed, track);
}
