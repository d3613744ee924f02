/*!
 * Translation of YouTube metadata and subtitles with a language model.
 *
 * - `core`: the translation service, one model call per target language
 * - `detector`: source-language detection over a short text sample
 * - `models`: modes, requests, results and the per-run result set
 * - `prompts`: prompt templates for detection and translation
 * - `response`: splitting and cleaning of raw model replies
 */

// Re-export main types for easier usage
pub use self::core::TranslationService;
pub use self::detector::{SourceLanguageDetector, UNKNOWN_LANGUAGE};
pub use self::models::{
    ResultSet, SourceContent, TranslatedContent, TranslationMode, TranslationRequest, TranslationResult,
};
pub use self::prompts::{FIELD_DELIMITER, PromptTemplate};
pub use self::response::{clean_segment, parse_response};

// Submodules
pub mod core;
pub mod detector;
pub mod models;
pub mod prompts;
pub mod response;
