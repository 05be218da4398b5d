//! Delimited text reader (CSV/TXT).
//!
//! Vendor exports come in UTF-8 or one of the Central-European legacy code
//! pages, separated by `;` or `,`. Every encoding/delimiter pair is tried in
//! order; the first clean parse wins. Delimiter inference is the last resort.

use encoding_rs::{Encoding, ISO_8859_2, UTF_8, WINDOWS_1250};
use std::path::Path;
use tracing::debug;

use super::table::Table;
use crate::error::{ExtractionError, ExtractionOutput};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const ENCODINGS: [&Encoding; 3] = [UTF_8, WINDOWS_1250, ISO_8859_2];
const DELIMITERS: [u8; 2] = [b';', b','];
const INFERENCE_CANDIDATES: [u8; 4] = [b';', b',', b'\t', b'|'];

pub fn read_delimited(path: &Path) -> ExtractionOutput<Table> {
    let bytes = std::fs::read(path).map_err(|e| ExtractionError::unreadable(path, e))?;
    read_delimited_bytes(path, &bytes)
}

/// Parse already loaded bytes; `path` is only used for error context
pub fn read_delimited_bytes(path: &Path, bytes: &[u8]) -> ExtractionOutput<Table> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    for encoding in ENCODINGS {
        let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) else {
            debug!(encoding = encoding.name(), "Decoding failed");
            continue;
        };

        for delimiter in DELIMITERS.iter() {
            match parse(&text, *delimiter, false) {
                Ok(table) if is_wrong_delimiter(&table, *delimiter) => {
                    debug!(
                        encoding = encoding.name(),
                        delimiter = %(*delimiter as char),
                        "Single column header contains another delimiter, skipping"
                    );
                }
                Ok(table) => {
                    debug!(
                        encoding = encoding.name(),
                        delimiter = %(*delimiter as char),
                        columns = table.column_count(),
                        rows = table.rows.len(),
                        "Parsed delimited file"
                    );
                    return Ok(table);
                }
                Err(e) => {
                    debug!(
                        encoding = encoding.name(),
                        delimiter = %(*delimiter as char),
                        error = %e,
                        "Parse attempt failed"
                    );
                }
            }
        }
    }

    let (text, _) = WINDOWS_1250.decode_without_bom_handling(bytes);
    let delimiter = infer_delimiter(&text);
    debug!(delimiter = %(delimiter as char), "Falling back to inferred delimiter");

    parse(&text, delimiter, true).map_err(|e| ExtractionError::unreadable(path, e))
}

fn parse(text: &str, delimiter: u8, flexible: bool) -> Result<Table, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(flexible)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    Ok(Table::from_rows(rows.into_iter()))
}

/// A single column whose header still contains another candidate delimiter
fn is_wrong_delimiter(table: &Table, delimiter: u8) -> bool {
    table.column_count() == 1
        && INFERENCE_CANDIDATES
            .iter()
            .filter(|d| **d != delimiter)
            .any(|d| table.headers[0].contains(*d as char))
}

/// Most frequent candidate in the first non-blank line; `,` when none occur
fn infer_delimiter(text: &str) -> u8 {
    let first_line = text
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or_default();

    let mut best = (b',', 0usize);
    for candidate in INFERENCE_CANDIDATES {
        let count = first_line.matches(candidate as char).count();
        if count > best.1 {
            best = (candidate, count);
        }
    }
    best.0
}
