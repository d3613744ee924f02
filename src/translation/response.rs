/*!
 * Parsing and cleaning of raw model replies.
 *
 * Replies are split on the `|||` delimiter and mapped positionally to the
 * fields the mode asked for. Each field is then stripped of the scaffold the
 * model tends to echo back: markdown code fences and field labels such as
 * `Title:` or `[SRT]:`.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::translation::models::{TranslatedContent, TranslationMode, TranslationResult};
use crate::translation::prompts::FIELD_DELIMITER;

// @const: Whole line holding a code fence, optionally with a language tag
static FENCE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*```[A-Za-z0-9_+.\-]*[ \t]*\r?$\n?").expect("fence line regex is valid")
});

// @const: Field label at the very start of a segment
static LEADING_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:\*\*|__)?\s*\[?\s*(?:title|description|srt|subtitles?)\s*\]?\s*(?:\*\*|__)?\s*:\s*(?:\*\*|__)?"
    ).expect("leading label regex is valid")
});

const FENCE_TOKEN: &str = "```";

fn clean_once(text: &str) -> String {
    let without_fence_lines = FENCE_LINE.replace_all(text, "");
    let without_fences = without_fence_lines.replace(FENCE_TOKEN, "");
    let trimmed = without_fences.trim();
    LEADING_LABEL.replace(trimmed, "").trim().to_string()
}

/// Remove code fences and leading field labels, then trim
///
/// Runs until nothing changes, so cleaning cleaned text is a no-op.
pub fn clean_segment(text: &str) -> String {
    let mut current = clean_once(text);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Split a reply into at most `fields` segments; the last one keeps any extra delimiters
fn split_fields(raw: &str, fields: usize) -> Vec<&str> {
    let segments: Vec<&str> = raw.splitn(fields, FIELD_DELIMITER).collect();
    if segments.len() < fields {
        warn!(
            "Model reply has {} of {} expected '{}'-separated fields",
            segments.len(), fields, FIELD_DELIMITER
        );
    }
    segments
}

/// Map a raw reply to the fields requested by `mode`
///
/// Missing segments become empty strings. An empty reply is a failure.
pub fn parse_response(raw: &str, mode: TranslationMode) -> TranslationResult {
    if raw.trim().is_empty() {
        return TranslationResult::failure("Model returned an empty response");
    }

    let segment = |segments: &[&str], index: usize| {
        segments.get(index).map(|text| clean_segment(text)).unwrap_or_default()
    };

    let content = match mode {
        TranslationMode::All => {
            let segments = split_fields(raw, mode.expected_fields());
            TranslatedContent {
                title: segment(&segments, 0),
                description: segment(&segments, 1),
                subtitle_blob: segment(&segments, 2),
            }
        },
        TranslationMode::MetadataOnly => {
            let segments = split_fields(raw, mode.expected_fields());
            TranslatedContent {
                title: segment(&segments, 0),
                description: segment(&segments, 1),
                subtitle_blob: String::new(),
            }
        },
        TranslationMode::SubtitlesOnly => TranslatedContent {
            title: String::new(),
            description: String::new(),
            subtitle_blob: clean_segment(raw),
        },
    };

    debug!(
        "Parsed reply: title {} chars, description {} chars, subtitles {} chars",
        content.title.chars().count(),
        content.description.chars().count(),
        content.subtitle_blob.chars().count()
    );

    TranslationResult::Success(content)
}
