//! Delimited-text reader for bronze files.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::{DataTable, SourceMetadata};
use crate::error::{KimballError, Result};

/// Candidate delimiters, in preference order for ties.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Lines inspected when sniffing the delimiter.
const SNIFF_LINES: usize = 10;

/// Parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Fixed delimiter; `None` sniffs it from the first lines.
    pub delimiter: Option<char>,
    /// Whether the first row holds column names.
    pub has_header: bool,
    /// Stop after this many data rows.
    pub max_rows: Option<usize>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
        }
    }
}

/// Reads CSV/TSV/PSV text into [`DataTable`]s.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Read a file, returning the table and its provenance.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| KimballError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let delimiter = self.resolve_delimiter(&bytes)?;
        let table = self.parse_bytes(&bytes, delimiter)?;
        let hash = format!("sha256:{:x}", Sha256::digest(&bytes));

        debug!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            delimiter = %(delimiter as char).escape_default(),
            "parsed bronze file"
        );

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            bytes.len() as u64,
            format_name(delimiter),
            table.row_count(),
            table.column_count(),
        );
        Ok((table, metadata))
    }

    /// Parse in-memory text.
    pub fn parse_str(&self, text: &str) -> Result<DataTable> {
        let bytes = text.as_bytes();
        let delimiter = self.resolve_delimiter(bytes)?;
        self.parse_bytes(bytes, delimiter)
    }

    fn resolve_delimiter(&self, bytes: &[u8]) -> Result<u8> {
        match self.config.delimiter {
            Some(c) if c.is_ascii() => Ok(c as u8),
            Some(c) => Err(KimballError::InvalidDelimiter(format!(
                "'{c}' is not a single-byte character"
            ))),
            None => detect_delimiter(bytes),
        }
    }

    fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut records = reader.records();
        let mut rows: Vec<Vec<String>> = Vec::new();

        let headers: Vec<String> = if self.config.has_header {
            match records.next() {
                Some(record) => record?.iter().map(|h| h.trim().to_string()).collect(),
                None => return Err(KimballError::EmptyData("no header row".to_string())),
            }
        } else {
            Vec::new()
        };

        for record in records {
            if self.config.max_rows.is_some_and(|max| rows.len() >= max) {
                break;
            }
            rows.push(record?.iter().map(str::to_string).collect());
        }

        let headers = if self.config.has_header {
            headers
        } else {
            let width = rows.first().map(Vec::len).unwrap_or(0);
            (1..=width).map(|i| format!("column_{i}")).collect()
        };

        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(KimballError::EmptyData("no columns found".to_string()));
        }
        if rows.is_empty() {
            return Err(KimballError::EmptyData("no data rows found".to_string()));
        }

        Ok(DataTable::new(headers, rows))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

fn format_name(delimiter: u8) -> &'static str {
    match delimiter {
        b'\t' => "tsv",
        b',' => "csv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
}

/// Pick the delimiter that splits the leading lines most consistently.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();

    if lines.is_empty() {
        return Err(KimballError::EmptyData("no lines to analyze".to_string()));
    }

    let mut best = (b',', 0usize);
    for &delimiter in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_unquoted(line, delimiter))
            .collect();
        let first = counts[0];
        if first == 0 {
            continue;
        }

        let score = if counts.iter().all(|&c| c == first) {
            first * 1000
        } else {
            first
        };
        if score > best.1 {
            best = (delimiter, score);
        }
    }

    Ok(best.0)
}

/// Count delimiter occurrences outside double quotes.
fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    line.bytes()
        .filter(|&b| {
            if b == b'"' {
                in_quotes = !in_quotes;
            }
            b == delimiter && !in_quotes
        })
        .count()
}
