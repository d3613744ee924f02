/*!
 * Core translation service implementation.
 *
 * This module contains the main TranslationService struct, which turns one
 * `TranslationRequest` into one `TranslationResult` through a single model
 * call. Errors never escape a translation: they become a `Failure` entry so
 * the caller can move on to the next language.
 */

use anyhow::Result;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::TranslationConfig;
use crate::providers::{Provider, create_provider};
use crate::subtitle_processor;
use crate::translation::detector::SourceLanguageDetector;
use crate::translation::models::{TranslationRequest, TranslationResult};
use crate::translation::prompts::translation_prompt;
use crate::translation::response::parse_response;

/// Main translation service
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Provider implementation
    provider: Arc<dyn Provider>,

    /// Model identifier passed to every call
    model: String,

    /// Title length limit written into prompts
    title_max_chars: usize,

    /// Characters sampled for detection
    detection_sample_chars: usize,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let provider = create_provider(config)?;
        Ok(Self::with_provider(provider, config))
    }

    /// Create a service around an existing provider
    pub fn with_provider(provider: Arc<dyn Provider>, config: &TranslationConfig) -> Self {
        Self {
            provider,
            model: config.get_model(),
            title_max_chars: config.common.title_max_chars,
            detection_sample_chars: config.common.detection_sample_chars,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Detector sharing this service's provider and model
    pub fn detector(&self) -> SourceLanguageDetector {
        SourceLanguageDetector::new(Arc::clone(&self.provider), self.model.clone(), self.detection_sample_chars)
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<()> {
        info!("Testing connection to {} with model {}", self.provider.name(), self.model);
        self.provider.test_connection(&self.model).await?;
        Ok(())
    }

    /// Translate one request into its target language
    pub async fn translate(&self, request: &TranslationRequest) -> TranslationResult {
        let start_time = Instant::now();
        let language = &request.target_language.name;
        let prompt = translation_prompt(request, self.title_max_chars);

        let reply = match self.provider.generate(&self.model, &prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Translation into {} failed: {}", language, e);
                return TranslationResult::failure(e);
            },
        };

        let result = parse_response(&reply, request.mode);
        debug!("Translated into {} in {:?}", language, start_time.elapsed());

        if let Some(content) = result.content() {
            if request.mode.includes_subtitles()
                && !request.subtitle_blob.trim().is_empty()
                && !subtitle_processor::timecodes_preserved(&request.subtitle_blob, &content.subtitle_blob)
            {
                warn!("Timecodes of the {} subtitles differ from the source", language);
            }
        }

        result
    }
}
