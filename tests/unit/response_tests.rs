/*!
 * Tests for model reply parsing and cleaning
 */

use autotrans::translation::{clean_segment, parse_response, TranslationMode, TranslationResult};

fn content(result: TranslationResult) -> autotrans::translation::TranslatedContent {
    result.content().cloned().expect("reply should parse")
}

/// Test the typical decorated three-field reply
#[test]
fn test_parse_response_withFenceAndLabels_shouldCleanEveryField() {
    let raw = "```\nTitle: Bonjour|||Description: Une vidéo|||[SRT]: 1\n00:00:01,000 --> 00:00:02,000\nSalut\n```";

    let parsed = content(parse_response(raw, TranslationMode::All));

    assert_eq!(parsed.title, "Bonjour");
    assert_eq!(parsed.description, "Une vidéo");
    assert_eq!(parsed.subtitle_blob, "1\n00:00:01,000 --> 00:00:02,000\nSalut");
}

/// Test metadata-only replies never carry subtitles
#[test]
fn test_parse_response_withMetadataMode_shouldLeaveSubtitlesEmpty() {
    let parsed = content(parse_response("Hola|||Descripción|||sobra", TranslationMode::MetadataOnly));

    assert_eq!(parsed.title, "Hola");
    assert_eq!(parsed.description, "Descripción|||sobra");
    assert!(parsed.subtitle_blob.is_empty());
}

/// Test subtitle-only replies are not split on the delimiter
#[test]
fn test_parse_response_withSubtitlesMode_shouldKeepWholeReply() {
    let raw = "1\n00:00:01,000 --> 00:00:02,000\nA ||| B";

    let parsed = content(parse_response(raw, TranslationMode::SubtitlesOnly));

    assert!(parsed.title.is_empty());
    assert!(parsed.description.is_empty());
    assert_eq!(parsed.subtitle_blob, raw);
}

/// Test empty or whitespace replies become failures
#[test]
fn test_parse_response_withBlankReply_shouldFail() {
    for mode in [TranslationMode::All, TranslationMode::MetadataOnly, TranslationMode::SubtitlesOnly] {
        let result = parse_response(" \n\t", mode);
        assert!(!result.is_success());
        assert!(result.error().is_some());
    }
}

/// Test a reply with fewer fields than asked for
#[test]
fn test_parse_response_withSingleField_shouldFillOthersEmpty() {
    let parsed = content(parse_response("Titre seulement", TranslationMode::All));

    assert_eq!(parsed.title, "Titre seulement");
    assert!(parsed.description.is_empty());
    assert!(parsed.subtitle_blob.is_empty());
}

/// Test cleaning is stable when applied twice
#[test]
fn test_clean_segment_appliedTwice_shouldNotChange() {
    let inputs = [
        "```srt\n**Title:** Hello\n```",
        "Description: Description: nested",
        "  plain text  ",
        "```",
    ];

    for input in inputs {
        let once = clean_segment(input);
        assert_eq!(clean_segment(&once), once, "input {:?}", input);
    }
    assert_eq!(clean_segment("  plain text  "), "plain text");
    assert_eq!(clean_segment("```"), "");
}

/// Test that labels are only stripped at the start of a field
#[test]
fn test_clean_segment_withLabelInsideText_shouldKeepIt() {
    assert_eq!(clean_segment("The Title: a story"), "The Title: a story");
}
