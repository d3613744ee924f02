/*!
 * Export of run results to disk.
 *
 * - one `<display name>.srt` per language with subtitles
 * - a zip archive bundling those subtitle files
 * - a CSV sheet with the translated titles and descriptions
 * - a JSON report of the whole run
 */

use log::{debug, info};
use serde::Serialize;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::app_config::ExportConfig;
use crate::app_controller::RunReport;
use crate::errors::AppError;
use crate::file_utils::{FileManager, sanitize_file_name};
use crate::translation::ResultSet;

/// Header row of the metadata sheet
pub const SHEET_HEADER: [&str; 3] = ["language", "title", "description"];

/// Where and what to export
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    pub zip_file_name: String,
    pub sheet_file_name: String,
    pub report_file_name: String,
    pub write_zip: bool,
    pub write_sheet: bool,
    pub write_report: bool,
    pub force_overwrite: bool,
}

impl ExportOptions {
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            output_dir: PathBuf::from(&config.output_dir),
            zip_file_name: config.zip_file_name.clone(),
            sheet_file_name: config.sheet_file_name.clone(),
            report_file_name: config.report_file_name.clone(),
            write_zip: true,
            write_sheet: true,
            write_report: config.write_report,
            force_overwrite: false,
        }
    }
}

/// Files written by `export_report`
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    pub subtitle_files: Vec<PathBuf>,
    pub zip_path: Option<PathBuf>,
    pub sheet_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
}

/// File name of a language's subtitle file, e.g. `01. French.srt`
pub fn srt_file_name(language: &str) -> String {
    format!("{}.srt", sanitize_file_name(language))
}

fn check_writable(path: &Path, force_overwrite: bool) -> Result<(), AppError> {
    FileManager::check_writable(path, force_overwrite).map_err(|e| AppError::Export(e.to_string()))
}

fn subtitle_paths<'a>(results: &'a ResultSet, output_dir: &Path) -> Vec<(PathBuf, &'a str)> {
    results.successes()
        .filter(|(_, content)| content.has_subtitles())
        .map(|(language, content)| (output_dir.join(srt_file_name(language)), content.subtitle_blob.as_str()))
        .collect()
}

/// Refuse the whole export when any target exists and overwriting is off
fn check_all_writable<'p>(paths: impl IntoIterator<Item = &'p Path>, force_overwrite: bool) -> Result<(), AppError> {
    for path in paths {
        check_writable(path, force_overwrite)?;
    }
    Ok(())
}

/// Build an in-memory zip of every non-empty subtitle, `None` when there is none
pub fn build_zip_archive(results: &ResultSet) -> Result<Option<Vec<u8>>, AppError> {
    let mut subtitles = results.successes()
        .filter(|(_, content)| content.has_subtitles())
        .peekable();
    if subtitles.peek().is_none() {
        return Ok(None);
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (language, content) in subtitles {
        writer.start_file(srt_file_name(language), options)?;
        writer.write_all(content.subtitle_blob.as_bytes())?;
    }

    let cursor = writer.finish()?;
    Ok(Some(cursor.into_inner()))
}

/// Render the metadata sheet as CSV text, `None` when no language has metadata
pub fn build_metadata_sheet(results: &ResultSet) -> Result<Option<String>, AppError> {
    let mut rows = results.successes()
        .filter(|(_, content)| content.has_metadata())
        .peekable();
    if rows.peek().is_none() {
        return Ok(None);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(SHEET_HEADER)?;
    for (language, content) in rows {
        writer.write_record([language, content.title.as_str(), content.description.as_str()])?;
    }

    let bytes = writer.into_inner().map_err(|e| AppError::Export(e.to_string()))?;
    String::from_utf8(bytes)
        .map(Some)
        .map_err(|e| AppError::Export(e.to_string()))
}

/// Write any serializable value as pretty JSON
pub fn write_report_json<T: Serialize>(report: &T, path: &Path, force_overwrite: bool) -> Result<(), AppError> {
    check_writable(path, force_overwrite)?;
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| AppError::Export(format!("Failed to serialize report: {}", e)))?;
    FileManager::write_to_file(path, &json)?;
    Ok(())
}

/// Export everything `options` asks for
///
/// Every target path is checked before the first write, so a refused export
/// leaves the output directory as it was.
pub fn export_report(report: &RunReport, options: &ExportOptions) -> Result<ExportSummary, AppError> {
    let dir = &options.output_dir;
    let subtitles = subtitle_paths(&report.results, dir);

    let zip = if options.write_zip {
        build_zip_archive(&report.results)?.map(|bytes| (dir.join(&options.zip_file_name), bytes))
    } else {
        None
    };
    if options.write_zip && zip.is_none() {
        info!("No subtitles to archive, skipping {}", options.zip_file_name);
    }

    let sheet = if options.write_sheet {
        build_metadata_sheet(&report.results)?.map(|text| (dir.join(&options.sheet_file_name), text))
    } else {
        None
    };
    if options.write_sheet && sheet.is_none() {
        info!("No titles or descriptions to export, skipping {}", options.sheet_file_name);
    }

    let report_path = options.write_report.then(|| dir.join(&options.report_file_name));

    let planned = subtitles.iter().map(|(path, _)| path.as_path())
        .chain(zip.iter().map(|(path, _)| path.as_path()))
        .chain(sheet.iter().map(|(path, _)| path.as_path()))
        .chain(report_path.as_deref());
    check_all_writable(planned, options.force_overwrite)?;

    FileManager::ensure_dir(dir)?;
    let mut summary = ExportSummary::default();

    for (path, text) in subtitles {
        FileManager::write_to_file(&path, text)?;
        debug!("Wrote subtitles to {:?}", path);
        summary.subtitle_files.push(path);
    }

    if let Some((path, bytes)) = zip {
        FileManager::write_bytes(&path, &bytes)?;
        summary.zip_path = Some(path);
    }

    if let Some((path, text)) = sheet {
        FileManager::write_to_file(&path, &text)?;
        summary.sheet_path = Some(path);
    }

    if let Some(path) = report_path {
        write_report_json(report, &path, true)?;
        summary.report_path = Some(path);
    }

    info!(
        "Exported {} subtitle files to {:?}",
        summary.subtitle_files.len(),
        dir
    );
    Ok(summary)
}
