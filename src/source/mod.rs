//! CSV input source.
//!
//! Reads a header row plus data rows and yields one `RawRow` per data
//! line: an ordered column-name → raw-string mapping. Column order in the
//! file is arbitrary; columns are only ever referenced through the
//! configured field mappings. Malformed records are surfaced per row so
//! one bad line never aborts the batch.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Errors produced while reading CSV input.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read CSV header: {0}")]
    Header(String),

    #[error("Malformed CSV record at line {line}: {message}")]
    Malformed { line: u64, message: String },
}

/// One CSV data line, keyed by header column name.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based line number in the source file (header = 1).
    pub line: u64,
    values: HashMap<String, String>,
}

impl RawRow {
    pub fn new(line: u64, values: HashMap<String, String>) -> Self {
        Self { line, values }
    }

    /// Raw cell value for a column, if the column exists.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Build a row from (column, value) pairs. Test and fixture helper.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { line: 0, values }
    }
}

/// CSV file reader producing `RawRow`s in input order.
pub struct CsvSource<R: Read> {
    reader: csv::Reader<R>,
}

impl CsvSource<File> {
    /// Open a CSV file from disk.
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self::from_reader(file))
    }
}

impl<R: Read> CsvSource<R> {
    /// Wrap any reader producing CSV text with a header row.
    pub fn from_reader(reader: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .flexible(false)
            .from_reader(reader);
        Self { reader }
    }

    /// Read every data row, in input order.
    ///
    /// The outer `Result` fails only when the header itself is unreadable;
    /// per-record errors are carried inline so the engine can skip the bad
    /// row and continue.
    pub fn rows(mut self) -> Result<Vec<Result<RawRow, SourceError>>, SourceError> {
        let headers: Vec<String> = self
            .reader
            .headers()
            .map_err(|e| SourceError::Header(e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for (index, record) in self.reader.records().enumerate() {
            // Data rows start at line 2, after the header.
            let fallback_line = index as u64 + 2;
            let row = match record {
                Ok(record) => {
                    let line = record
                        .position()
                        .map(|p| p.line())
                        .unwrap_or(fallback_line);
                    let values = headers
                        .iter()
                        .cloned()
                        .zip(record.iter().map(str::to_string))
                        .collect();
                    Ok(RawRow::new(line, values))
                }
                Err(e) => Err(SourceError::Malformed {
                    line: e
                        .position()
                        .map(|p| p.line())
                        .unwrap_or(fallback_line),
                    message: e.to_string(),
                }),
            };
            rows.push(row);
        }

        Ok(rows)
    }
}
