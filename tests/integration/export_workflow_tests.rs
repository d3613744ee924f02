/*!
 * Tests running a translation and exporting its results to disk
 */

use anyhow::Result;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use autotrans::app_config::ExportConfig;
use autotrans::app_controller::{NoopListener, RunReport};
use autotrans::errors::AppError;
use autotrans::export::{export_report, ExportOptions};
use autotrans::providers::mock::{MockProvider, MockReply};
use autotrans::translation::{SourceContent, TranslationMode};
use crate::common;

async fn run_report(mode: TranslationMode, replies: Vec<MockReply>) -> RunReport {
    let provider = MockProvider::scripted(replies);
    let controller = common::controller_with(&provider);
    let content = SourceContent::new("Hello world", "A short video", common::SAMPLE_SRT);

    controller
        .run(&content, mode, &common::entries(&["French", "Korean"]), &NoopListener)
        .await
        .unwrap()
}

fn options(output_dir: &Path) -> ExportOptions {
    let mut options = ExportOptions::from_config(&ExportConfig::default());
    options.output_dir = output_dir.to_path_buf();
    options
}

/// Test that a full run exports every artifact
#[tokio::test]
async fn test_export_report_afterFullRun_shouldWriteAllFiles() -> Result<()> {
    let report = run_report(TranslationMode::All, vec![
        MockReply::text("English"),
        MockReply::text("Bonjour ||| Salut ||| 1\n00:00:01,000 --> 00:00:04,000\nCeci est un test."),
        MockReply::text("안녕 ||| 설명 ||| 1\n00:00:01,000 --> 00:00:04,000\n테스트"),
    ]).await;
    let temp_dir = common::create_temp_dir()?;
    let output_dir = temp_dir.path().join("out");

    let summary = export_report(&report, &options(&output_dir))?;

    assert_eq!(summary.subtitle_files, vec![
        output_dir.join("01. French.srt"),
        output_dir.join("02. Korean.srt"),
    ]);
    assert_eq!(std::fs::read_to_string(&summary.subtitle_files[1])?, "1\n00:00:01,000 --> 00:00:04,000\n테스트");

    let zip_path = summary.zip_path.clone().unwrap();
    assert_eq!(zip_path, output_dir.join("Subtitles_Only.zip"));
    let mut archive = zip::ZipArchive::new(File::open(&zip_path)?)?;
    assert_eq!(archive.len(), 2);
    let mut french = String::new();
    archive.by_name("01. French.srt")?.read_to_string(&mut french)?;
    assert!(french.ends_with("Ceci est un test."));

    let sheet = std::fs::read_to_string(summary.sheet_path.clone().unwrap())?;
    assert_eq!(sheet.lines().collect::<Vec<_>>(), vec![
        "language,title,description",
        "01. French,Bonjour,Salut",
        "02. Korean,안녕,설명",
    ]);

    let report_json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(summary.report_path.unwrap())?)?;
    assert_eq!(report_json["detected_language"], "English");
    assert_eq!(report_json["mode"], "all");
    assert_eq!(report_json["results"]["02. Korean"]["title"], "안녕");

    Ok(())
}

/// Test that failed languages are left out of the files but kept in the report
#[tokio::test]
async fn test_export_report_withFailedLanguage_shouldSkipItsFiles() -> Result<()> {
    let report = run_report(TranslationMode::All, vec![
        MockReply::text("English"),
        MockReply::text(""),
        MockReply::text("안녕 ||| 설명 ||| 1\n00:00:01,000 --> 00:00:04,000\n테스트"),
    ]).await;
    let temp_dir = common::create_temp_dir()?;

    let summary = export_report(&report, &options(temp_dir.path()))?;

    assert_eq!(summary.subtitle_files, vec![temp_dir.path().join("02. Korean.srt")]);
    let report_json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(summary.report_path.unwrap())?)?;
    assert!(report_json["results"]["01. French"]["error"].is_string());

    Ok(())
}

/// Test that a metadata-only run produces no archive
#[tokio::test]
async fn test_export_report_afterMetadataRun_shouldSkipZip() -> Result<()> {
    let report = run_report(TranslationMode::MetadataOnly, vec![
        MockReply::text("English"),
        MockReply::text("Bonjour ||| Salut"),
        MockReply::text("안녕 ||| 설명"),
    ]).await;
    let temp_dir = common::create_temp_dir()?;

    let summary = export_report(&report, &options(temp_dir.path()))?;

    assert!(summary.subtitle_files.is_empty());
    assert!(summary.zip_path.is_none());
    assert!(!temp_dir.path().join("Subtitles_Only.zip").exists());
    assert!(summary.sheet_path.is_some());

    Ok(())
}

/// Test that a second export needs the overwrite flag
#[tokio::test]
async fn test_export_report_twice_shouldRequireForceOverwrite() -> Result<()> {
    let report = run_report(TranslationMode::SubtitlesOnly, vec![MockReply::text("English")]).await;
    let temp_dir = common::create_temp_dir()?;
    let mut options = options(temp_dir.path());
    options.write_report = false;

    let first = export_report(&report, &options)?;
    assert_eq!(first.subtitle_files.len(), 2);
    assert!(first.sheet_path.is_none());

    assert!(matches!(export_report(&report, &options), Err(AppError::Export(_))));

    options.force_overwrite = true;
    assert!(export_report(&report, &options).is_ok());

    Ok(())
}

/// Test that one existing target stops the export before anything is written
#[tokio::test]
async fn test_export_report_withExistingSheet_shouldLeaveDirectoryUntouched() -> Result<()> {
    let report = run_report(TranslationMode::All, vec![
        MockReply::text("English"),
        MockReply::text("Bonjour ||| Salut ||| 1\n00:00:01,000 --> 00:00:04,000\nCeci est un test."),
        MockReply::text("안녕 ||| 설명 ||| 1\n00:00:01,000 --> 00:00:04,000\n테스트"),
    ]).await;
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "Metadata.csv", "old")?;

    let result = export_report(&report, &options(temp_dir.path()));

    assert!(matches!(result, Err(AppError::Export(_))));
    let names: Vec<String> = std::fs::read_dir(temp_dir.path())?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<Result<_, _>>()?;
    assert_eq!(names, vec!["Metadata.csv".to_string()]);
    assert_eq!(std::fs::read_to_string(temp_dir.path().join("Metadata.csv"))?, "old");

    Ok(())
}
