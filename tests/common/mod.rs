/*!
 * Common test utilities for the autotrans test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use std::sync::{Arc, Mutex};
use anyhow::Result;
use tempfile::TempDir;

use autotrans::app_config::Config;
use autotrans::app_controller::{Controller, RunListener};
use autotrans::language_catalog::LanguageEntry;
use autotrans::providers::mock::MockProvider;
use autotrans::translation::TranslationResult;

/// Three-entry SRT used across the suite
pub const SAMPLE_SRT: &str = "1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
It contains multiple entries.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
";

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Default configuration without the inter-call pause
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.translation.common.rate_limit_delay_ms = 0;
    config
}

/// Controller whose calls all go to `provider`
pub fn controller_with(provider: &MockProvider) -> Controller {
    Controller::with_provider(fast_config(), Arc::new(provider.clone()))
        .expect("default configuration builds a controller")
}

/// Catalog-style entries numbered from 1 in the given order
pub fn entries(names: &[&str]) -> Vec<LanguageEntry> {
    names.iter()
        .enumerate()
        .map(|(index, name)| LanguageEntry::new(index as u32 + 1, *name))
        .collect()
}

/// Listener recording every event as a line of text
#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<String>>,
}

impl RecordingListener {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl RunListener for RecordingListener {
    fn detected(&self, language: &str, excluded: &[LanguageEntry]) {
        self.push(format!("detected {} excluding {}", language, excluded.len()));
    }

    fn language_started(&self, target: &LanguageEntry, index: usize, total: usize) {
        self.push(format!("start {} {}/{}", target, index + 1, total));
    }

    fn language_finished(&self, target: &LanguageEntry, result: &TranslationResult) {
        let outcome = if result.is_success() { "ok" } else { "failed" };
        self.push(format!("finish {} {}", target, outcome));
    }
}
