//! A deliberately small CSV decoder for machine-generated dataset files.
//!
//! The first line is the header; every following line becomes one [`RawRecord`]
//! keyed by header name. Quoting is not supported: a `"` is an ordinary character
//! and every `,` separates fields, so field values cannot contain commas.

use crate::datasets::error::DecodeError;
use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;

/// One data line of a CSV file, keyed by header name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRecord {
    line: u64,
    fields: HashMap<String, String>,
}

impl RawRecord {
    /// Line number of the record in the (trimmed) input, header being line 1.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// The value of `column`, or `""` when the header has no such column.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or_default()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Decodes `raw` into records and converts each one with `map_row`.
///
/// - Surrounding whitespace of the whole text is ignored; `\n` and `\r\n` both end a line.
/// - Input with only a header (or nothing) yields no records.
/// - Header names and values are trimmed. If a header name repeats, the later column wins.
/// - A short line reads its missing trailing fields as `""`; extra fields are ignored.
/// - Blank lines between records are skipped.
pub fn decode_csv<T, F>(raw: &str, mut map_row: F) -> Result<Vec<T>, DecodeError>
where
    F: FnMut(RawRecord) -> Result<T, DecodeError>,
{
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(raw.trim().as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let mut fields = HashMap::with_capacity(headers.len());
        for (index, header) in headers.iter().enumerate() {
            fields.insert(header.clone(), record.get(index).unwrap_or_default().to_string());
        }
        rows.push(map_row(RawRecord { line, fields })?);
    }
    Ok(rows)
}

/// Decodes `raw` into records without any conversion.
pub fn decode_records(raw: &str) -> Result<Vec<RawRecord>, DecodeError> {
    decode_csv(raw, Ok)
}
