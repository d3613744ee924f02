/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use autotrans::app_config::{Config, ExclusionMatch, LogLevel, TranslationProvider};
use autotrans::translation::TranslationMode;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.translation.provider, TranslationProvider::Gemini);
    assert_eq!(config.translation.get_model(), "gemini-2.0-flash");
    assert_eq!(config.translation.get_timeout_secs(), 120);

    let common = &config.translation.common;
    assert_eq!(common.rate_limit_delay_ms, 500);
    assert_eq!(common.detection_sample_chars, 300);
    assert_eq!(common.title_max_chars, 100);
    assert_eq!(common.default_mode, TranslationMode::All);
    assert_eq!(common.enabled_modes.len(), 3);

    assert_eq!(config.catalog.exclusion_match, ExclusionMatch::Exact);
    assert_eq!(config.export.zip_file_name, "Subtitles_Only.zip");
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    // A missing API key is reported by the run driver, not here
    config.translation.provider = TranslationProvider::OpenAI;
    assert!(config.validate().is_ok());

    config.translation.active_provider_config_mut().endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
    config.translation.active_provider_config_mut().endpoint = "https://api.openai.com/v1".to_string();

    config.translation.common.enabled_modes = vec![TranslationMode::SubtitlesOnly];
    assert!(config.validate().is_err());
    config.translation.common.default_mode = TranslationMode::SubtitlesOnly;
    assert!(config.validate().is_ok());

    config.catalog.languages = vec!["  ".to_string()];
    assert!(config.validate().is_err());
}

/// Test that a missing file is created with defaults and read back
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded.translation.provider, created.translation.provider);
    assert_eq!(loaded.catalog.languages, created.catalog.languages);

    Ok(())
}

/// Test that omitted sections fall back to their defaults
#[test]
fn test_load_or_create_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", r#"{
        "translation": {
            "provider": "ollama",
            "common": { "rate_limit_delay_ms": 0, "default_mode": "metadata" }
        },
        "catalog": { "languages": ["Korean", "French"], "exclusion_match": "substring" }
    }"#)?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
    assert_eq!(config.translation.common.default_mode, TranslationMode::MetadataOnly);
    assert_eq!(config.translation.common.title_max_chars, 100);
    assert_eq!(config.catalog.exclusion_match, ExclusionMatch::Substring);
    assert_eq!(config.export.output_dir, "translations");
    assert!(config.validate().is_ok());

    Ok(())
}

/// Test provider parsing and key requirements
#[test]
fn test_translation_provider_fromStr_shouldParseKnownNames() {
    assert_eq!("Gemini".parse::<TranslationProvider>().unwrap(), TranslationProvider::Gemini);
    assert_eq!("ollama".parse::<TranslationProvider>().unwrap(), TranslationProvider::Ollama);
    assert!("lmstudio".parse::<TranslationProvider>().is_err());

    assert!(TranslationProvider::Anthropic.requires_api_key());
    assert!(!TranslationProvider::Ollama.requires_api_key());
}
