//! JSON export implementation.
//!
//! Reports are serialized as-is; a single-root map or report is written as
//! an object, several roots as an array.

use super::{ExportData, Exporter};
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

fn write_json<W: Write, T: Serialize + ?Sized>(value: &T, writer: &mut W) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

fn write_one_or_many<W: Write, T: Serialize>(items: &[T], writer: &mut W) -> io::Result<()> {
    match items {
        [single] => write_json(single, writer),
        many => write_json(many, writer),
    }
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData<'_>, writer: &mut W) -> io::Result<()> {
        match data {
            ExportData::Search(report) => write_json(report, writer),
            ExportData::Unused(report) => write_json(report, writer),
            ExportData::Map(maps) => write_one_or_many(maps, writer),
            ExportData::Report(reports) => write_one_or_many(reports, writer),
        }
    }
}
