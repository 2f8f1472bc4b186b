//! Minimal CSV reading for ERP snapshot exports.
//!
//! Handles quoted fields, doubled quotes, embedded newlines, and CRLF line
//! endings. Field-count mismatches are left to the typed-row builders, which
//! skip and count malformed rows.

use std::io;
use std::path::Path;

/// A raw CSV table: header row plus data rows, all as untyped text.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Resolves a column index by header name, ignoring case and padding.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }
}

/// Reads a CSV file whose first record is a header row.
pub fn read_table(path: &Path) -> io::Result<CsvTable> {
    let mut records = read_records(path)?;
    if records.is_empty() {
        return Ok(CsvTable {
            header: Vec::new(),
            rows: Vec::new(),
        });
    }
    let header = records.remove(0);
    Ok(CsvTable {
        header,
        rows: records,
    })
}

/// Reads a headerless CSV file as raw records.
pub fn read_records(path: &Path) -> io::Result<Vec<Vec<String>>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_records(&content))
}

/// Parses CSV text into records.
pub fn parse_records(content: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    // Doubled quote is an escaped quote; anything else ends
                    // the quoted section.
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => record.push(std::mem::take(&mut field)),
                '\r' => {}
                '\n' => {
                    record.push(std::mem::take(&mut field));
                    let blank_line = record.len() == 1 && record[0].is_empty();
                    if blank_line {
                        record.clear();
                    } else {
                        records.push(std::mem::take(&mut record));
                    }
                }
                _ => field.push(c),
            }
        }
    }

    // Final record when the file lacks a trailing newline.
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    records
}
