/*!
 * Value types flowing through a translation run.
 */

use anyhow::anyhow;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::language_catalog::LanguageEntry;

/// Which subset of the content a translation request covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationMode {
    /// Title, description and subtitles
    #[default]
    All,
    /// Title and description
    #[serde(rename = "metadata")]
    MetadataOnly,
    /// Subtitles only
    #[serde(rename = "subtitles")]
    SubtitlesOnly,
}

impl TranslationMode {
    /// Whether the mode translates the subtitle blob
    pub fn includes_subtitles(&self) -> bool {
        matches!(self, Self::All | Self::SubtitlesOnly)
    }

    /// Whether the mode translates title and description
    pub fn includes_metadata(&self) -> bool {
        matches!(self, Self::All | Self::MetadataOnly)
    }

    /// Number of `|||`-separated fields the model is asked to return
    pub fn expected_fields(&self) -> usize {
        match self {
            Self::All => 3,
            Self::MetadataOnly => 2,
            Self::SubtitlesOnly => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::MetadataOnly => "metadata",
            Self::SubtitlesOnly => "subtitles",
        }
    }
}

impl fmt::Display for TranslationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TranslationMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" | "full" => Ok(Self::All),
            "metadata" | "metadata_only" | "metadata-only" => Ok(Self::MetadataOnly),
            "subtitles" | "subtitles_only" | "subtitles-only" | "srt" => Ok(Self::SubtitlesOnly),
            _ => Err(anyhow!("Invalid translation mode: {}", s)),
        }
    }
}

/// Source content supplied by the user for one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceContent {
    pub title: String,
    pub description: String,
    pub subtitle_blob: String,
}

impl SourceContent {
    pub fn new(title: impl Into<String>, description: impl Into<String>, subtitle_blob: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            subtitle_blob: subtitle_blob.into(),
        }
    }

    /// Text the detector samples after the title for the given mode
    pub fn detection_body(&self, mode: TranslationMode) -> &str {
        if mode.includes_subtitles() {
            &self.subtitle_blob
        } else {
            &self.description
        }
    }
}

/// One translation call's input, built fresh for every target language
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub title: String,
    pub description: String,
    pub subtitle_blob: String,
    pub target_language: LanguageEntry,
    pub mode: TranslationMode,
}

impl TranslationRequest {
    pub fn new(content: &SourceContent, target_language: LanguageEntry, mode: TranslationMode) -> Self {
        Self {
            title: content.title.clone(),
            description: content.description.clone(),
            subtitle_blob: content.subtitle_blob.clone(),
            target_language,
            mode,
        }
    }
}

/// Successfully translated fields; fields outside the mode stay empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedContent {
    pub title: String,
    pub description: String,
    #[serde(rename = "subtitles")]
    pub subtitle_blob: String,
}

impl TranslatedContent {
    pub fn has_metadata(&self) -> bool {
        !self.title.is_empty() || !self.description.is_empty()
    }

    pub fn has_subtitles(&self) -> bool {
        !self.subtitle_blob.is_empty()
    }
}

/// Outcome of translating into one language: a payload or an error, never both
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslationResult {
    Success(TranslatedContent),
    Failure { error: String },
}

impl TranslationResult {
    pub fn failure(error: impl fmt::Display) -> Self {
        Self::Failure { error: error.to_string() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn content(&self) -> Option<&TranslatedContent> {
        match self {
            Self::Success(content) => Some(content),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { error } => Some(error),
        }
    }
}

/// Results of a run keyed by target display string, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    entries: Vec<(String, TranslationResult)>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a result; re-inserting a language replaces it in place
    pub fn insert(&mut self, language: impl Into<String>, result: TranslationResult) {
        let language = language.into();
        match self.entries.iter_mut().find(|(key, _)| *key == language) {
            Some(slot) => slot.1 = result,
            None => self.entries.push((language, result)),
        }
    }

    pub fn get(&self, language: &str) -> Option<&TranslationResult> {
        self.entries.iter()
            .find(|(key, _)| key == language)
            .map(|(_, result)| result)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TranslationResult)> {
        self.entries.iter().map(|(key, result)| (key.as_str(), result))
    }

    pub fn languages(&self) -> Vec<&str> {
        self.entries.iter().map(|(key, _)| key.as_str()).collect()
    }

    /// Successful results only, in processing order
    pub fn successes(&self) -> impl Iterator<Item = (&str, &TranslatedContent)> {
        self.iter().filter_map(|(key, result)| result.content().map(|content| (key, content)))
    }

    pub fn failure_count(&self) -> usize {
        self.entries.iter().filter(|(_, result)| !result.is_success()).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (language, result) in &self.entries {
            map.serialize_entry(language, result)?;
        }
        map.end()
    }
}
