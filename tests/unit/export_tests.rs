/*!
 * Tests for the export writers
 */

use anyhow::Result;
use std::fs::File;
use std::io::Read;

use autotrans::export::{build_metadata_sheet, build_zip_archive, srt_file_name, write_report_json, SHEET_HEADER};
use autotrans::translation::{ResultSet, TranslatedContent, TranslationResult};
use crate::common;

fn metadata_only_results() -> ResultSet {
    let mut results = ResultSet::new();
    results.insert("01. French", TranslationResult::Success(TranslatedContent {
        title: "Titre".to_string(),
        description: "Ligne 1\nLigne 2".to_string(),
        subtitle_blob: String::new(),
    }));
    results.insert("02. Korean", TranslationResult::Success(TranslatedContent {
        title: "제목".to_string(),
        description: "설명".to_string(),
        subtitle_blob: String::new(),
    }));
    results
}

/// Test the subtitle file naming
#[test]
fn test_srt_file_name_shouldSanitizeDisplayName() {
    assert_eq!(srt_file_name("02. Korean"), "02. Korean.srt");
    assert_eq!(srt_file_name("10. a:b"), "10. a_b.srt");
}

/// Test the zip is skipped when no language has subtitles
#[test]
fn test_build_zip_archive_withoutSubtitles_shouldSkip() -> Result<()> {
    assert!(build_zip_archive(&metadata_only_results())?.is_none());
    Ok(())
}

/// Test the sheet keeps rows in catalog order and quotes multi-line cells
#[test]
fn test_build_metadata_sheet_shouldWriteReadableCsv() -> Result<()> {
    let sheet = build_metadata_sheet(&metadata_only_results())?.expect("sheet");

    let mut reader = csv::Reader::from_reader(sheet.as_bytes());
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    assert_eq!(headers, SHEET_HEADER);

    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "01. French");
    assert_eq!(&rows[0][2], "Ligne 1\nLigne 2");
    assert_eq!(&rows[1][1], "제목");
    Ok(())
}

/// Test the report refuses to clobber an existing file
#[test]
fn test_write_report_json_withExistingFile_shouldRequireForce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "report.json", "old")?;

    assert!(write_report_json(&metadata_only_results(), &path, false).is_err());
    write_report_json(&metadata_only_results(), &path, true)?;

    let mut text = String::new();
    File::open(&path)?.read_to_string(&mut text)?;
    assert!(text.contains("01. French"));
    Ok(())
}

/// Test the JSON report of a result set
#[test]
fn test_write_report_json_shouldSerializeResultsByLanguage() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("report.json");
    let mut results = metadata_only_results();
    results.insert("03. German", TranslationResult::failure("Request timed out"));

    write_report_json(&results, &path, false)?;

    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(value["01. French"]["title"], "Titre");
    assert_eq!(value["03. German"]["error"], "Request timed out");
    Ok(())
}
