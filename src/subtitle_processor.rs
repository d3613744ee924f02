use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, anyhow};
use log::{warn, debug};

// @module: SRT parsing and timecode checks

// @const: SRT timestamp line, `HH:MM:SS,mmm --> HH:MM:SS,mmm`
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d{2}):(\d{2}):(\d{2})[,.](\d{3})")
        .expect("valid timestamp regex")
});

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text
    pub text: String,
}

impl SubtitleEntry {
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: impl Into<String>) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text: text.into(),
        }
    }

    // @creates: Validated subtitle entry
    // @validates: Time range and non-empty text
    pub fn new_validated(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: &str) -> Result<Self> {
        if end_time_ms <= start_time_ms {
            return Err(anyhow!(
                "Invalid time range: end time {} <= start time {}",
                end_time_ms, start_time_ms
            ));
        }

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(anyhow!("Empty subtitle text for entry {}", seq_num));
        }

        Ok(Self::new(seq_num, start_time_ms, end_time_ms, trimmed_text))
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

/// Parse SRT text into entries
///
/// Malformed blocks are skipped with a warning; the call only fails when no
/// entry at all could be read. Entries keep their original order.
pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>> {
    let mut entries = Vec::new();

    let mut seq_num: Option<usize> = None;
    let mut times: Option<(u64, u64)> = None;
    let mut text = String::new();

    let mut flush = |seq_num: Option<usize>, times: Option<(u64, u64)>, text: &mut String| {
        if let (Some(seq), Some((start_ms, end_ms))) = (seq_num, times) {
            match SubtitleEntry::new_validated(seq, start_ms, end_ms, text) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping invalid subtitle entry {}: {}", seq, e),
            }
        }
        text.clear();
    };

    for (line_number, line) in content.lines().enumerate() {
        let trimmed = line.trim().trim_start_matches('\u{feff}');

        if trimmed.is_empty() {
            if times.is_some() && !text.is_empty() {
                flush(seq_num.take(), times.take(), &mut text);
            }
            continue;
        }

        if seq_num.is_none() {
            if let Ok(num) = trimmed.parse::<usize>() {
                seq_num = Some(num);
                continue;
            }
        }

        if seq_num.is_some() && times.is_none() {
            if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                times = Some((timestamp_from_captures(&caps, 1), timestamp_from_captures(&caps, 5)));
                continue;
            }
        }

        if times.is_some() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(trimmed);
        } else {
            debug!("Ignoring line {} outside of a subtitle block: {}", line_number + 1, trimmed);
        }
    }
    flush(seq_num, times, &mut text);

    if entries.is_empty() {
        return Err(anyhow!("No valid subtitle entries were found in the SRT content"));
    }

    Ok(entries)
}

fn timestamp_from_captures(caps: &regex::Captures, start_idx: usize) -> u64 {
    let part = |offset: usize| -> u64 {
        caps.get(start_idx + offset)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    (part(0) * 3600 + part(1) * 60 + part(2)) * 1000 + part(3)
}

/// Every timecode line in `content`, normalised to `HH:MM:SS,mmm --> HH:MM:SS,mmm`
pub fn extract_timecodes(content: &str) -> Vec<String> {
    TIMESTAMP_REGEX.captures_iter(content)
        .map(|caps| {
            format!(
                "{} --> {}",
                SubtitleEntry::format_timestamp(timestamp_from_captures(&caps, 1)),
                SubtitleEntry::format_timestamp(timestamp_from_captures(&caps, 5))
            )
        })
        .collect()
}

/// Whether `translated` carries exactly the timecodes of `source`, in order
pub fn timecodes_preserved(source: &str, translated: &str) -> bool {
    extract_timecodes(source) == extract_timecodes(translated)
}
