use chrono::{DateTime, Local};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::RunError;
use crate::language_catalog::{LanguageCatalog, LanguageEntry, compute_targets};
use crate::providers::Provider;
use crate::subtitle_processor;
use crate::translation::{
    ResultSet, SourceContent, TranslationMode, TranslationRequest, TranslationResult, TranslationService,
};

// @module: Run orchestration for one batch of translations

/// Whether a run is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
}

/// Observer of a run's progress
///
/// Every method has a no-op default, so implementors pick what they need.
pub trait RunListener: Send + Sync {
    /// Called once with the detector's answer and the entries it excluded
    fn detected(&self, _language: &str, _excluded: &[LanguageEntry]) {}

    /// Called before translating into `target`, with its 0-based position
    fn language_started(&self, _target: &LanguageEntry, _index: usize, _total: usize) {}

    /// Called right after the result for `target` was stored
    fn language_finished(&self, _target: &LanguageEntry, _result: &TranslationResult) {}
}

/// Listener that ignores every event
#[derive(Debug, Default)]
pub struct NoopListener;

impl RunListener for NoopListener {}

/// Listener drawing an indicatif progress bar on stderr
pub struct ProgressListener {
    progress_bar: ProgressBar,
}

impl ProgressListener {
    pub fn new() -> Self {
        let progress_bar = ProgressBar::new(0);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Self { progress_bar }
    }

    pub fn finish(&self) {
        self.progress_bar.finish_and_clear();
    }
}

impl Default for ProgressListener {
    fn default() -> Self {
        Self::new()
    }
}

impl RunListener for ProgressListener {
    fn detected(&self, language: &str, excluded: &[LanguageEntry]) {
        if excluded.is_empty() {
            self.progress_bar.println(format!("Detected source language: {}", language));
        } else {
            self.progress_bar.println(format!("Detected source language: {} (skipping {})", language, join_entries(excluded)));
        }
    }

    fn language_started(&self, target: &LanguageEntry, _index: usize, total: usize) {
        self.progress_bar.set_length(total as u64);
        self.progress_bar.set_message(target.display_name());
    }

    fn language_finished(&self, target: &LanguageEntry, result: &TranslationResult) {
        match result.error() {
            None => self.progress_bar.println(format!("✓ {}", target)),
            Some(error) => self.progress_bar.println(format!("✗ {}: {}", target, error)),
        }
        self.progress_bar.inc(1);
    }
}

/// Everything a finished run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Detector answer, `Unknown` when detection failed
    pub detected_language: String,
    /// Selected entries removed by self-exclusion
    pub excluded_languages: Vec<String>,
    pub mode: TranslationMode,
    /// Display names of the languages actually translated, in order
    pub targets: Vec<String>,
    pub results: ResultSet,
    pub started_at: DateTime<Local>,
    pub elapsed_ms: u64,
}

impl RunReport {
    pub fn success_count(&self) -> usize {
        self.results.len() - self.results.failure_count()
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }
}

fn join_entries(entries: &[LanguageEntry]) -> String {
    entries.iter().map(LanguageEntry::display_name).collect::<Vec<_>>().join(", ")
}

// Clears the running flag even if the run future is dropped midway
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Main application controller driving translation runs
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Numbered language catalog built from the configuration
    catalog: LanguageCatalog,

    // @field: Provider injected by the caller; built from config when absent
    provider: Option<Arc<dyn Provider>>,

    // @field: Set while a run is in progress
    running: AtomicBool,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> anyhow::Result<Self> {
        let catalog = LanguageCatalog::from_config(&config.catalog)?;
        Ok(Self {
            config,
            catalog,
            provider: None,
            running: AtomicBool::new(false),
        })
    }

    /// Create a controller that sends every call to `provider`
    pub fn with_provider(config: Config, provider: Arc<dyn Provider>) -> anyhow::Result<Self> {
        let mut controller = Self::with_config(config)?;
        controller.provider = Some(provider);
        Ok(controller)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &LanguageCatalog {
        &self.catalog
    }

    pub fn state(&self) -> RunState {
        if self.running.load(Ordering::SeqCst) {
            RunState::Running
        } else {
            RunState::Idle
        }
    }

    /// Check the inputs of a run; nothing remote happens here
    pub fn validate_input(
        &self,
        content: &SourceContent,
        mode: TranslationMode,
        selection: &[LanguageEntry],
    ) -> Result<(), RunError> {
        let common = &self.config.translation.common;
        if !common.enabled_modes.contains(&mode) {
            return Err(RunError::InvalidInput(format!("Translation mode '{}' is not enabled", mode)));
        }

        if selection.is_empty() {
            return Err(RunError::InvalidInput("Select at least one target language".to_string()));
        }

        let has = |text: &str| !text.trim().is_empty();
        let has_content = match mode {
            TranslationMode::All => has(&content.title) || has(&content.subtitle_blob),
            TranslationMode::MetadataOnly => has(&content.title) || has(&content.description),
            TranslationMode::SubtitlesOnly => has(&content.subtitle_blob),
        };
        if !has_content {
            let needed = match mode {
                TranslationMode::All => "a title or subtitles",
                TranslationMode::MetadataOnly => "a title or description",
                TranslationMode::SubtitlesOnly => "subtitles",
            };
            return Err(RunError::InvalidInput(format!("Mode '{}' needs {} to translate", mode, needed)));
        }

        if self.provider.is_none() {
            let translation = &self.config.translation;
            if translation.provider.requires_api_key() && translation.get_api_key().is_empty() {
                return Err(RunError::InvalidInput(format!(
                    "An API key is required for the {} provider",
                    translation.provider.display_name()
                )));
            }
        }

        if mode.includes_subtitles() && has(&content.subtitle_blob) {
            if let Err(e) = subtitle_processor::parse_srt_string(&content.subtitle_blob) {
                warn!("Subtitles do not look like SRT, translating them as plain text: {}", e);
            }
        }

        Ok(())
    }

    fn translation_service(&self) -> Result<TranslationService, RunError> {
        match &self.provider {
            Some(provider) => Ok(TranslationService::with_provider(Arc::clone(provider), &self.config.translation)),
            None => TranslationService::new(&self.config.translation)
                .map_err(|e| RunError::InvalidInput(e.to_string())),
        }
    }

    /// Send a short prompt to the configured provider
    pub async fn test_connection(&self) -> anyhow::Result<()> {
        let service = self.translation_service()?;
        service.test_connection().await
    }

    /// Detect the source language without translating anything
    pub async fn detect(&self, content: &SourceContent, mode: TranslationMode) -> Result<String, RunError> {
        let service = self.translation_service()?;
        Ok(service.detector().detect(content, mode, &self.catalog.listing()).await)
    }

    /// Run the main workflow: detect once, then translate each target in order
    pub async fn run(
        &self,
        content: &SourceContent,
        mode: TranslationMode,
        selection: &[LanguageEntry],
        listener: &dyn RunListener,
    ) -> Result<RunReport, RunError> {
        self.validate_input(content, mode, selection)?;
        let service = self.translation_service()?;

        if self.running.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_err() {
            return Err(RunError::AlreadyRunning);
        }
        let _guard = RunningGuard(&self.running);

        let started_at = Local::now();
        let start_time = Instant::now();
        let mut results = ResultSet::new();
        info!("Starting {} run with {} via {}", mode, service.model(), service.provider_name());

        let detected = service.detector().detect(content, mode, &self.catalog.listing()).await;
        let selection = compute_targets(selection, &detected, self.config.catalog.exclusion_match);
        listener.detected(&detected, &selection.excluded);
        if selection.excluded.is_empty() {
            info!("Detected source language '{}'", detected);
        } else {
            info!("Detected source language '{}', skipping {}", detected, join_entries(&selection.excluded));
        }

        let delay = Duration::from_millis(self.config.translation.common.rate_limit_delay_ms);
        let total = selection.targets.len();
        for (index, target) in selection.targets.iter().enumerate() {
            listener.language_started(target, index, total);
            debug!("Translating into {} ({}/{})", target, index + 1, total);

            let request = TranslationRequest::new(content, target.clone(), mode);
            let result = service.translate(&request).await;
            results.insert(target.display_name(), result);
            if let Some(result) = results.get(&target.display_name()) {
                listener.language_finished(target, result);
            }

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        let report = RunReport {
            detected_language: detected,
            excluded_languages: selection.excluded.iter().map(LanguageEntry::display_name).collect(),
            mode,
            targets: selection.targets.iter().map(LanguageEntry::display_name).collect(),
            results,
            started_at,
            elapsed_ms: start_time.elapsed().as_millis() as u64,
        };
        info!(
            "Run finished: {} succeeded, {} failed in {:.1}s",
            report.success_count(),
            report.results.failure_count(),
            report.elapsed().as_secs_f64()
        );

        Ok(report)
    }
}
