// ============================================================
// SOURCE RECORD
// ============================================================
// One CSV line keyed by header name

use serde::Serialize;
use std::collections::HashMap;

/// A single data line of the source CSV
#[derive(Debug, Clone, Serialize)]
pub struct SourceRecord {
    /// Position in the file (1-based, header excluded)
    pub ordinal: usize,

    /// Header name to raw value
    pub fields: HashMap<String, String>,

    /// Number of values actually present on the line
    #[serde(skip)]
    pub field_count: usize,

    /// Number of columns declared by the header row
    #[serde(skip)]
    pub header_count: usize,
}

impl SourceRecord {
    /// Build a record by zipping header names with line values.
    /// Missing trailing values are left out of the map, surplus values are dropped.
    pub fn new<'a, H, V>(ordinal: usize, headers: H, values: V) -> Self
    where
        H: IntoIterator<Item = &'a str>,
        V: IntoIterator<Item = &'a str>,
    {
        let headers: Vec<&str> = headers.into_iter().collect();
        let values: Vec<&str> = values.into_iter().collect();

        let fields = headers
            .iter()
            .zip(values.iter())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();

        Self {
            ordinal,
            fields,
            field_count: values.len(),
            header_count: headers.len(),
        }
    }

    /// Raw value of a column, if the column exists
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// First value that is present and non-blank, trying columns in order
    pub fn first_non_empty(&self, columns: &[&str]) -> Option<&str> {
        columns
            .iter()
            .filter_map(|column| self.get(column))
            .map(str::trim)
            .find(|value| !value.is_empty())
    }

    /// Whether the line had a different number of values than the header
    pub fn is_ragged(&self) -> bool {
        self.field_count != self.header_count
    }

    /// Compact JSON rendering of the raw fields, for diagnostics
    pub fn to_log_string(&self) -> String {
        serde_json::to_string(&self.fields).unwrap_or_else(|_| format!("{:?}", self.fields))
    }
}
