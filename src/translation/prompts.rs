/*!
 * Prompt templates for language detection and content translation.
 */

use crate::translation::models::{TranslationMode, TranslationRequest};

/// Separator between fields in multi-field replies
pub const FIELD_DELIMITER: &str = "|||";

/// Prompt template with `{placeholder}` substitution.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Asks for a single catalog name identifying the sample's language.
    pub const LANGUAGE_DETECTION: &'static str = "Identify the language of the text below. \
Answer with exactly one language name from this list, without its number, and nothing else: {languages}.

Text: {sample}";

    /// Rules shared by every translation mode.
    pub const TRANSLATION_RULES: &'static str = "Rules:
- Keep SRT sequence numbers and timecodes exactly as they are.
- Write only in {language}; do not mix writing systems or add romanization.
- Localize culturally specific terms and idioms instead of transliterating them.
- Keep the translated title shorter than {title_max_chars} characters.
- Preserve emoji, punctuation and special characters exactly.
- Do not add labels, explanations or markdown code fences.";

    pub const ALL_FIELDS: &'static str = "Translate the following YouTube content into {language}.
Return exactly three sections separated by '|||' in this order: Title ||| Description ||| SRT.

{rules}

[Title]: {title}
[Description]: {description}
[SRT]: {subtitles}";

    pub const METADATA_FIELDS: &'static str = "Translate the following YouTube title and description into {language}.
Return exactly two sections separated by '|||' in this order: Title ||| Description.

{rules}

[Title]: {title}
[Description]: {description}";

    pub const SUBTITLE_FIELDS: &'static str = "Translate the following SRT subtitles into {language}.
Return only the translated SRT content.

{rules}

[SRT]: {subtitles}";

    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Template for the given translation mode
    pub fn for_mode(mode: TranslationMode) -> Self {
        match mode {
            TranslationMode::All => Self::new(Self::ALL_FIELDS),
            TranslationMode::MetadataOnly => Self::new(Self::METADATA_FIELDS),
            TranslationMode::SubtitlesOnly => Self::new(Self::SUBTITLE_FIELDS),
        }
    }

    /// Replace each `{key}` placeholder of the template with its value
    ///
    /// Single pass over the template: substituted values are never rescanned,
    /// and unknown placeholders are left as written.
    pub fn render(&self, values: &[(&str, &str)]) -> String {
        let mut output = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find('{') {
            output.push_str(&rest[..start]);
            let after = &rest[start + 1..];

            let substitution = after.find('}').and_then(|end| {
                let key = &after[..end];
                values.iter()
                    .find(|(name, _)| *name == key)
                    .map(|(_, value)| (*value, end))
            });

            match substitution {
                Some((value, end)) => {
                    output.push_str(value);
                    rest = &after[end + 1..];
                },
                None => {
                    output.push('{');
                    rest = after;
                },
            }
        }

        output.push_str(rest);
        output
    }
}

/// Build the detection prompt from a text sample and the catalog listing
pub fn detection_prompt(sample: &str, languages: &str) -> String {
    PromptTemplate::new(PromptTemplate::LANGUAGE_DETECTION)
        .render(&[("languages", languages), ("sample", sample)])
}

/// Build the translation prompt for one request
pub fn translation_prompt(request: &TranslationRequest, title_max_chars: usize) -> String {
    let language = request.target_language.name.as_str();
    let title_max_chars = title_max_chars.to_string();
    let rules = PromptTemplate::new(PromptTemplate::TRANSLATION_RULES)
        .render(&[("language", language), ("title_max_chars", title_max_chars.as_str())]);

    PromptTemplate::for_mode(request.mode).render(&[
        ("rules", rules.as_str()),
        ("language", language),
        ("title", request.title.as_str()),
        ("description", request.description.as_str()),
        ("subtitles", request.subtitle_blob.as_str()),
    ])
}
