//! Report writers.
//!
//! Each [`InventoryReport`] is written as a CSV file and, optionally, a JSON
//! file named after the project and the dependency section.

pub mod csv;
pub mod json;

use crate::error::Result;
use crate::types::InventoryReport;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// CSV format - spreadsheet-friendly
    Csv,
    /// JSON format - the records as an array
    Json,
}

impl ExportFormat {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the report to the given writer.
    fn export<W: Write>(&self, report: &InventoryReport, writer: &mut W) -> io::Result<()>;
}

/// Export a report in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    report: &InventoryReport,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Csv => csv::CsvExporter.export(report, writer),
        ExportFormat::Json => json::JsonExporter.export(report, writer),
    }
}

/// `<project>-<section>`, the file name of a report without its extension
pub fn report_stem(report: &InventoryReport) -> String {
    let project = report.project_name.replace(['/', '\\'], "-");
    format!("{}-{}", project, report.section.manifest_key())
}

/// Write a report in each of `formats`, creating `output_dir` if needed.
///
/// Returns the paths written.
pub fn write_report(
    output_dir: &Path,
    report: &InventoryReport,
    formats: &[ExportFormat],
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;

    let stem = report_stem(report);
    let mut written = Vec::with_capacity(formats.len());

    for &format in formats {
        let path = output_dir.join(format!("{}.{}", stem, format.extension()));
        let mut writer = BufWriter::new(File::create(&path)?);
        export(format, report, &mut writer)?;
        writer.flush()?;

        info!(
            "The {} file was written successfully: {}",
            format.extension().to_uppercase(),
            path.display()
        );
        written.push(path);
    }

    Ok(written)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_stem_sanitizes_scoped_names() {
        let mut report = fixtures::report(false);
        report.project_name = "@acme/app".to_string();
        assert_eq!(report_stem(&report), "@acme-app-dependencies");

        report.project_name = "my.app".to_string();
        assert_eq!(report_stem(&report), "my.app-dependencies");
    }

    #[test]
    fn test_write_report_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("nested").join("output");
        let report = fixtures::report(true);

        let written =
            write_report(&output_dir, &report, &[ExportFormat::Csv, ExportFormat::Json]).unwrap();

        assert_eq!(
            written,
            vec![
                output_dir.join("demo-dependencies.csv"),
                output_dir.join("demo-dependencies.json"),
            ]
        );
        assert!(written.iter().all(|p| p.is_file()));
    }

    #[test]
    fn test_export_dispatches_by_format() {
        let report = fixtures::report(false);

        let mut csv = Vec::new();
        export(ExportFormat::Csv, &report, &mut csv).unwrap();
        let csv = String::from_utf8(csv).unwrap();
        assert!(csv.starts_with("No,Name,Version,License Name,License Link\n"));

        let mut json = Vec::new();
        export(ExportFormat::Json, &report, &mut json).unwrap();
        let records: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(records.as_array().map(Vec::len), Some(2));
    }
}
