// ============================================================
// CSV PARSER
// ============================================================
// Header-keyed parsing of decoded CSV text into source records

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::warn;

use crate::domain::error::{ImportError, Result};
use crate::domain::ranking::SourceRecord;

/// Records parsed from one source file
#[derive(Debug, Clone)]
pub struct ParsedSource {
    pub headers: Vec<String>,
    pub records: Vec<SourceRecord>,
    /// Lines the CSV reader could not tokenize
    pub skipped: usize,
}

/// CSV parser keyed by the header row
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
        }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn reader<'a>(&self, content: &'a str) -> csv::Reader<&'a [u8]> {
        ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .flexible(true) // Ragged lines are handled by the normalizer
            .from_reader(content.as_bytes())
    }

    /// Parse only the header row. Fails when there is no usable header.
    pub fn parse_headers(&self, content: &str) -> Result<Vec<String>> {
        let mut reader = self.reader(content);
        let headers = reader
            .headers()
            .map_err(|e| ImportError::ParseError(format!("Failed to read CSV headers: {}", e)))?;

        let headers = clean_headers(headers);
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::ParseError("CSV header row is empty".to_string()));
        }
        Ok(headers)
    }

    /// Parse every data line into a `SourceRecord`
    pub fn parse_content(&self, content: &str) -> Result<ParsedSource> {
        let mut reader = self.reader(content);
        let headers = reader
            .headers()
            .map_err(|e| ImportError::ParseError(format!("Failed to read CSV headers: {}", e)))?;
        let headers = clean_headers(headers);

        let mut records = Vec::new();
        let mut skipped = 0;

        for (idx, result) in reader.records().enumerate() {
            match result {
                Ok(record) => {
                    let ordinal = records.len() + skipped + 1;
                    records.push(SourceRecord::new(
                        ordinal,
                        headers.iter().map(String::as_str),
                        record.iter(),
                    ));
                }
                Err(e) => {
                    warn!(line = idx + 2, error = %e, "Skipping unreadable CSV line");
                    skipped += 1;
                }
            }
        }

        Ok(ParsedSource {
            headers,
            records,
            skipped,
        })
    }
}

// Excel-exported files may carry a BOM on the first header
fn clean_headers(headers: &StringRecord) -> Vec<String> {
    headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect()
}
