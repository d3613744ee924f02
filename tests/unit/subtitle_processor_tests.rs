/*!
 * Tests for SRT parsing and timecode checks
 */

use anyhow::Result;
use autotrans::subtitle_processor::{extract_timecodes, parse_srt_string, timecodes_preserved, SubtitleEntry};
use crate::common;

/// Test parsing of the shared sample file
#[test]
fn test_parse_srt_string_withSample_shouldReadAllEntries() -> Result<()> {
    let entries = parse_srt_string(common::SAMPLE_SRT)?;

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].seq_num, 1);
    assert_eq!(entries[0].start_time_ms, 1_000);
    assert_eq!(entries[2].end_time_ms, 14_000);
    assert_eq!(entries[1].text, "It contains multiple entries.");

    Ok(())
}

/// Test that free text is not mistaken for subtitles
#[test]
fn test_parse_srt_string_withPlainText_shouldFail() {
    assert!(parse_srt_string("just a paragraph of text").is_err());
    assert!(parse_srt_string("").is_err());
}

/// Test that broken blocks are skipped rather than failing the file
#[test]
fn test_parse_srt_string_withInvalidBlock_shouldSkipIt() -> Result<()> {
    let content = "1\n00:00:05,000 --> 00:00:01,000\nBackwards\n\n2\n00:00:06,000 --> 00:00:07,000\nFine\n";

    let entries = parse_srt_string(content)?;

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "Fine");
    Ok(())
}

/// Test that timecodes are normalised to the comma form
#[test]
fn test_extract_timecodes_withDotSeparator_shouldUseComma() {
    let timecodes = extract_timecodes("1\n01:02:03.456 --> 01:02:04.000\nHi\n");

    assert_eq!(timecodes, vec!["01:02:03,456 --> 01:02:04,000".to_string()]);
    assert_eq!(SubtitleEntry::format_timestamp(3_723_456), "01:02:03,456");
}

/// Test timecode extraction and comparison
#[test]
fn test_timecodes_preserved_shouldCompareTimecodesOnly() {
    let translated = common::SAMPLE_SRT
        .replace("This is a test subtitle.", "Ceci est un sous-titre.")
        .replace("For testing purposes.", "Pour les tests.");

    assert_eq!(extract_timecodes(common::SAMPLE_SRT).len(), 3);
    assert!(timecodes_preserved(common::SAMPLE_SRT, &translated));

    let shifted = translated.replace("00:00:10,000", "00:00:11,000");
    assert!(!timecodes_preserved(common::SAMPLE_SRT, &shifted));

    let truncated = "1\n00:00:01,000 --> 00:00:04,000\nCeci est un sous-titre.\n";
    assert!(!timecodes_preserved(common::SAMPLE_SRT, truncated));
}
