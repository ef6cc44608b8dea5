//! CSV export implementation.

use super::Exporter;
use crate::types::InventoryReport;
use std::io::{self, Write};

const COLUMNS: [&str; 5] = ["No", "Name", "Version", "License Name", "License Link"];
const DESCRIPTION_COLUMN: &str = "License Description";

/// CSV exporter implementation.
pub struct CsvExporter;

impl CsvExporter {
    /// Escape a field value for CSV format.
    ///
    /// Wraps the value in quotes if it contains commas, quotes, or line breaks.
    fn escape_field(value: &str) -> String {
        if value.contains([',', '"', '\n', '\r']) {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}

impl Exporter for CsvExporter {
    fn export<W: Write>(&self, report: &InventoryReport, writer: &mut W) -> io::Result<()> {
        let mut header = COLUMNS.join(",");
        if report.include_description {
            header.push(',');
            header.push_str(DESCRIPTION_COLUMN);
        }
        writeln!(writer, "{}", header)?;

        for record in &report.records {
            write!(
                writer,
                "{},{},{},{},{}",
                record.no,
                Self::escape_field(&record.name),
                Self::escape_field(&record.version),
                Self::escape_field(&record.license_name),
                Self::escape_field(&record.license_link),
            )?;
            if report.include_description {
                let description = record.license_description.as_deref().unwrap_or_default();
                write!(writer, ",{}", Self::escape_field(description))?;
            }
            writeln!(writer)?;
        }

        Ok(())
    }
}
