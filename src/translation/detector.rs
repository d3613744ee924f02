/*!
 * Source-language detection.
 *
 * One model call per run: the first characters of the title followed by the
 * body text are sent together with the catalog listing, and the model's
 * answer is returned trimmed. Any failure collapses to `UNKNOWN_LANGUAGE`,
 * which never excludes a target.
 */

use log::{debug, warn};
use std::sync::Arc;

use crate::providers::Provider;
use crate::translation::models::{SourceContent, TranslationMode};
use crate::translation::prompts::detection_prompt;

/// Answer used when detection fails or the model says nothing
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// First `max_chars` characters of `title` followed directly by `body`
pub fn detection_sample(title: &str, body: &str, max_chars: usize) -> String {
    title.chars().chain(body.chars()).take(max_chars).collect()
}

/// Asks the model which catalog language the source content is written in
#[derive(Debug, Clone)]
pub struct SourceLanguageDetector {
    provider: Arc<dyn Provider>,
    model: String,
    sample_chars: usize,
}

impl SourceLanguageDetector {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, sample_chars: usize) -> Self {
        Self {
            provider,
            model: model.into(),
            sample_chars,
        }
    }

    /// Detect the language of `content`, answering with one name from `listing`
    ///
    /// Never fails: errors and empty replies yield `UNKNOWN_LANGUAGE`.
    pub async fn detect(&self, content: &SourceContent, mode: TranslationMode, listing: &str) -> String {
        let sample = detection_sample(&content.title, content.detection_body(mode), self.sample_chars);
        if sample.trim().is_empty() {
            warn!("Nothing to sample for language detection");
            return UNKNOWN_LANGUAGE.to_string();
        }

        let prompt = detection_prompt(&sample, listing);
        debug!("Detecting source language from {} characters via {}", sample.chars().count(), self.provider.name());

        match self.provider.generate(&self.model, &prompt).await {
            Ok(answer) => {
                let answer = answer.trim();
                if answer.is_empty() {
                    warn!("Language detection returned an empty answer");
                    UNKNOWN_LANGUAGE.to_string()
                } else {
                    answer.to_string()
                }
            },
            Err(e) => {
                warn!("Language detection failed: {}", e);
                UNKNOWN_LANGUAGE.to_string()
            },
        }
    }
}
