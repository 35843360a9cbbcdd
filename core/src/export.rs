//! CSV and XLSX exports of the loaded RSVP list.
//!
//! # Design
//! `to_csv` works on arbitrary ordered JSON rows so it can export whatever
//! the admin view holds; `export_entries` is the download path, which tries
//! XLSX first and falls back to CSV on any workbook error.

use rust_xlsxwriter::{Workbook, Worksheet};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ExportError;
use crate::types::{RsvpEntry, FIELD_NAMES};

pub const CSV_FILE_NAME: &str = "wedding-rsvps.csv";
pub const XLSX_FILE_NAME: &str = "wedding-rsvps.xlsx";
pub const SHEET_NAME: &str = "RSVPs";

const CSV_CONTENT_TYPE: &str = "text/csv";
const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

/// A file ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    fn csv(entries: &[RsvpEntry]) -> Self {
        Self {
            file_name: CSV_FILE_NAME,
            content_type: CSV_CONTENT_TYPE,
            bytes: entries_to_csv(entries).into_bytes(),
        }
    }

    pub fn format(&self) -> ExportFormat {
        if self.file_name == XLSX_FILE_NAME {
            ExportFormat::Xlsx
        } else {
            ExportFormat::Csv
        }
    }
}

/// Render rows as CSV. The header is the first row's keys in insertion
/// order and every row is rendered in that order; an empty slice gives an
/// empty string. Lines are joined with `\n` without a trailing newline.
pub fn to_csv(rows: &[Map<String, Value>]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };
    let keys: Vec<&String> = first.keys().collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(csv_record(keys.iter().map(|key| key.to_string())));
    for row in rows {
        lines.push(csv_record(keys.iter().map(|key| cell_text(row.get(key.as_str())))));
    }
    lines.join("\n")
}

/// One CSV line. A record of a single empty field is written as `""` so
/// readers do not take it for a blank line.
fn csv_record(fields: impl Iterator<Item = String>) -> String {
    let line = fields.map(|field| escape_csv(&field)).collect::<Vec<_>>().join(",");
    if line.is_empty() {
        "\"\"".to_string()
    } else {
        line
    }
}

pub fn entries_to_csv(entries: &[RsvpEntry]) -> String {
    let rows: Vec<Map<String, Value>> = entries.iter().map(RsvpEntry::to_row).collect();
    to_csv(&rows)
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn escape_csv(value: &str) -> String {
    if value.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Build a single-sheet workbook named `RSVPs`: a header row followed by one
/// row per entry.
pub fn entries_to_xlsx(entries: &[RsvpEntry]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in FIELD_NAMES.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }
    for (i, entry) in entries.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_string(row, 0, entry.name.as_str())?;
        worksheet.write_string(row, 1, entry.email.as_str())?;
        worksheet.write_string(row, 2, entry.attending.as_str())?;
        worksheet.write_number(row, 3, f64::from(entry.guests))?;
        worksheet.write_string(row, 4, entry.message.as_str())?;
        worksheet.write_string(row, 5, entry.timestamp.as_str())?;
    }

    workbook.push_worksheet(worksheet);
    Ok(workbook.save_to_buffer()?)
}

/// Produce the download for `entries` in `format`. A failed XLSX build
/// degrades to CSV instead of erroring.
pub fn export_entries(entries: &[RsvpEntry], format: ExportFormat) -> ExportFile {
    export_with(entries, format, entries_to_xlsx)
}

fn export_with<F, E>(entries: &[RsvpEntry], format: ExportFormat, build_xlsx: F) -> ExportFile
where
    F: FnOnce(&[RsvpEntry]) -> Result<Vec<u8>, E>,
    E: std::fmt::Display,
{
    match format {
        ExportFormat::Csv => ExportFile::csv(entries),
        ExportFormat::Xlsx => match build_xlsx(entries) {
            Ok(bytes) => ExportFile {
                file_name: XLSX_FILE_NAME,
                content_type: XLSX_CONTENT_TYPE,
                bytes,
            },
            Err(e) => {
                warn!(error = %e, "xlsx export failed, falling back to csv");
                ExportFile::csv(entries)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn bo() -> RsvpEntry {
        RsvpEntry {
            name: "Bo".to_string(),
            email: "bo@x.com".to_string(),
            attending: "No".to_string(),
            guests: 0,
            message: "Sorry, can't make it".to_string(),
            timestamp: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn empty_rows_give_empty_output() {
        assert_eq!(to_csv(&[]), "");
    }

    #[test]
    fn header_follows_first_row_insertion_order() {
        let rows = vec![row(json!({"zeta": "1", "alpha": "2"})), row(json!({"alpha": "4", "zeta": "3"}))];
        assert_eq!(to_csv(&rows), "zeta,alpha\n1,2\n3,4");
    }

    #[test]
    fn missing_and_null_values_are_empty() {
        let rows = vec![row(json!({"a": "x", "b": "y"})), row(json!({"a": null})), row(json!({"b": 7}))];
        assert_eq!(to_csv(&rows), "a,b\nx,y\n,\n,7");
    }

    #[test]
    fn quoting_rules() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("line\nbreak"), "\"line\nbreak\"");
        assert_eq!(escape_csv(""), "");
    }

    #[test]
    fn entries_csv_uses_canonical_header() {
        let csv = entries_to_csv(&[bo()]);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("name,email,attending,guests,message,timestamp"));
        assert_eq!(
            lines.next(),
            Some("Bo,bo@x.com,No,0,\"Sorry, can't make it\",2025-01-01T00:00:00Z")
        );
    }

    #[test]
    fn xlsx_export_produces_zip_archive() {
        let file = export_entries(&[bo()], ExportFormat::Xlsx);
        assert_eq!(file.file_name, XLSX_FILE_NAME);
        assert_eq!(file.format(), ExportFormat::Xlsx);
        // xlsx files are zip archives
        assert!(file.bytes.starts_with(b"PK"));
    }

    #[test]
    fn xlsx_with_no_entries_still_builds() {
        let bytes = entries_to_xlsx(&[]).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn failed_xlsx_falls_back_to_csv() {
        let file = export_with(&[bo()], ExportFormat::Xlsx, |_| Err("disk full"));
        assert_eq!(file.file_name, CSV_FILE_NAME);
        assert_eq!(file.content_type, "text/csv");
        assert_eq!(String::from_utf8(file.bytes).unwrap(), entries_to_csv(&[bo()]));
    }

    #[test]
    fn csv_format_is_direct() {
        let file = export_entries(&[], ExportFormat::Csv);
        assert_eq!(file.file_name, CSV_FILE_NAME);
        assert!(file.bytes.is_empty());
    }
}
