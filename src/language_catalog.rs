/*!
 * Catalog of translatable languages.
 *
 * The catalog is a sorted, 1-indexed list of language names built from
 * configuration. Entries are displayed as `"NN. Name"`, which is also the
 * key results are stored and exported under.
 */

use anyhow::{Result, anyhow};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::app_config::{CatalogConfig, ExclusionMatch};
use crate::language_utils;

// Built-in target languages
pub const DEFAULT_LANGUAGES: &[&str] = &[
    "Arabic",
    "Bengali",
    "Cantonese",
    "Chinese (Simplified)",
    "Chinese (Traditional)",
    "Czech",
    "Danish",
    "Dutch",
    "English",
    "Filipino",
    "Finnish",
    "French",
    "German",
    "Greek",
    "Hawaiian",
    "Hebrew",
    "Hindi",
    "Hungarian",
    "Icelandic",
    "Indonesian",
    "Irish",
    "Italian",
    "Japanese",
    "Korean",
    "Latin",
    "Luxembourgish",
    "Malay",
    "Maori",
    "Min Nan",
    "Mongolian",
    "Nepali",
    "Norwegian",
    "Persian",
    "Polish",
    "Portuguese",
    "Portuguese (Brazil)",
    "Portuguese (Portugal)",
    "Russian",
    "Serbian",
    "Slovak",
    "Slovenian",
    "Spanish",
    "Swahili",
    "Swedish",
    "Thai",
    "Turkish",
    "Ukrainian",
    "Urdu",
    "Uzbek",
    "Vietnamese",
];

static ORDINAL_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+\s*[.)]\s*").expect("ordinal prefix regex is valid")
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("whitespace regex is valid")
});

static VARIANT_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*\([^()]*\)$").expect("variant suffix regex is valid")
});

/// A numbered catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguageEntry {
    /// 1-based position in the sorted catalog
    pub ordinal: u32,
    /// Language name as configured
    pub name: String,
}

impl LanguageEntry {
    pub fn new(ordinal: u32, name: impl Into<String>) -> Self {
        Self {
            ordinal,
            name: name.into(),
        }
    }

    /// `"NN. Name"` form used for display, result keys and file names
    pub fn display_name(&self) -> String {
        format!("{:02}. {}", self.ordinal, self.name)
    }
}

impl fmt::Display for LanguageEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}. {}", self.ordinal, self.name)
    }
}

/// Reduce a free-text language answer to a comparable identifier
///
/// Strips surrounding quotes and markdown emphasis, a leading `NN.`
/// ordinal and trailing periods, collapses whitespace and case-folds.
pub fn normalize_language_name(text: &str) -> String {
    let is_wrapper = |c: char| matches!(c, '"' | '\'' | '`' | '*' | '_') || c.is_whitespace();

    let stripped = text.trim_matches(is_wrapper);
    let stripped = ORDINAL_PREFIX.replace(stripped, "");
    let stripped = stripped.trim_end_matches('.').trim_matches(is_wrapper);

    WHITESPACE.replace_all(stripped, " ").to_lowercase()
}

/// How closely a detected-language answer names an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameMatch {
    None,
    /// The answer names the language without the entry's `(variant)` suffix
    Base,
    /// The answer names the entry itself
    Full,
}

fn name_match(detected: &str, entry: &LanguageEntry, strategy: ExclusionMatch) -> NameMatch {
    match strategy {
        ExclusionMatch::Substring => {
            if !detected.is_empty() && entry.display_name().contains(detected) {
                NameMatch::Full
            } else {
                NameMatch::None
            }
        },
        ExclusionMatch::Exact => {
            let normalized = normalize_language_name(detected);
            if normalized.is_empty() {
                return NameMatch::None;
            }

            let entry_name = normalize_language_name(&entry.name);
            let entry_base = VARIANT_SUFFIX.replace(&entry_name, "");
            let compare = |answer: &str| {
                if answer == entry_name {
                    NameMatch::Full
                } else if answer == entry_base {
                    NameMatch::Base
                } else {
                    NameMatch::None
                }
            };

            let direct = compare(&normalized);
            if direct != NameMatch::None || !language_utils::looks_like_language_code(&normalized) {
                return direct;
            }

            match language_utils::get_language_name(&normalized) {
                Ok(name) => compare(&normalize_language_name(&name)),
                Err(_) => NameMatch::None,
            }
        },
    }
}

/// Entries named by a detected-language answer
///
/// Full-name matches win; base-name matches such as `Chinese` for
/// `Chinese (Simplified)` only count when no entry is named in full.
fn matching_entries<'a>(entries: &'a [LanguageEntry], detected: &str, strategy: ExclusionMatch) -> Vec<&'a LanguageEntry> {
    let matches: Vec<(&LanguageEntry, NameMatch)> = entries.iter()
        .map(|entry| (entry, name_match(detected, entry, strategy)))
        .filter(|(_, kind)| *kind != NameMatch::None)
        .collect();

    let wanted = if matches.iter().any(|(_, kind)| *kind == NameMatch::Full) {
        NameMatch::Full
    } else {
        NameMatch::Base
    };

    matches.into_iter()
        .filter(|(_, kind)| *kind == wanted)
        .map(|(entry, _)| entry)
        .collect()
}

/// Targets left after removing the detected source language
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSelection {
    /// Languages to translate into, in selection order
    pub targets: Vec<LanguageEntry>,
    /// Selected languages removed because they match the source
    pub excluded: Vec<LanguageEntry>,
}

/// Remove every selected entry matching the detected source language
pub fn compute_targets(selected: &[LanguageEntry], detected: &str, strategy: ExclusionMatch) -> TargetSelection {
    let matched = matching_entries(selected, detected, strategy);
    let (excluded, targets) = selected.iter()
        .cloned()
        .partition(|entry| matched.contains(&entry));

    TargetSelection { targets, excluded }
}

/// Sorted, numbered list of supported languages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageCatalog {
    entries: Vec<LanguageEntry>,
}

impl LanguageCatalog {
    /// Build a catalog from language names
    ///
    /// Names are trimmed, blanks and duplicates dropped, and the rest sorted
    /// with the default string ordering before numbering from 1.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = names.into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        names.sort();
        names.dedup();

        let entries = names.into_iter()
            .enumerate()
            .map(|(index, name)| LanguageEntry::new(index as u32 + 1, name))
            .collect();

        Self { entries }
    }

    /// Build the catalog described by the configuration
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let catalog = Self::new(&config.languages);
        if catalog.is_empty() {
            return Err(anyhow!("The language catalog is empty"));
        }
        Ok(catalog)
    }

    pub fn entries(&self) -> &[LanguageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry with the given 1-based ordinal
    pub fn get(&self, ordinal: u32) -> Option<&LanguageEntry> {
        if ordinal == 0 {
            return None;
        }
        self.entries.get(ordinal as usize - 1)
    }

    /// Case-insensitive lookup by name or display string
    pub fn find_by_name(&self, name: &str) -> Option<&LanguageEntry> {
        let wanted = normalize_language_name(name);
        if wanted.is_empty() {
            return None;
        }
        self.entries.iter().find(|entry| normalize_language_name(&entry.name) == wanted)
    }

    pub fn display_names(&self) -> Vec<String> {
        self.entries.iter().map(LanguageEntry::display_name).collect()
    }

    /// Comma-separated display list embedded in the detection prompt
    pub fn listing(&self) -> String {
        self.display_names().join(", ")
    }

    /// Every entry, in catalog order
    pub fn select_all(&self) -> Vec<LanguageEntry> {
        self.entries.clone()
    }

    /// Resolve user selections given as ordinals, names or display strings
    ///
    /// The result follows catalog order with duplicates removed.
    pub fn select<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<LanguageEntry>> {
        let mut selected: Vec<LanguageEntry> = Vec::new();

        for token in tokens {
            let token = token.as_ref().trim();
            if token.is_empty() {
                continue;
            }

            let entry = if token.chars().all(|c| c.is_ascii_digit()) {
                token.parse::<u32>().ok().and_then(|ordinal| self.get(ordinal))
            } else {
                self.find_by_name(token)
            };

            let entry = entry.ok_or_else(|| anyhow!("Unknown language selection: {}", token))?;
            if !selected.contains(entry) {
                selected.push(entry.clone());
            }
        }

        selected.sort_by_key(|entry| entry.ordinal);
        Ok(selected)
    }

    /// Catalog entry a detected-language answer refers to, if any
    pub fn resolve_detected(&self, detected: &str, strategy: ExclusionMatch) -> Option<&LanguageEntry> {
        matching_entries(&self.entries, detected, strategy).into_iter().next()
    }
}

impl Default for LanguageCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGES)
    }
}
