//! JSON export implementation.
//!
//! Writes the records of a report as a single JSON array.

use super::Exporter;
use crate::types::InventoryReport;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, report: &InventoryReport, writer: &mut W) -> io::Result<()> {
        serde_json::to_writer(&mut *writer, &report.records)?;
        writeln!(writer)
    }
}
