use chrono::NaiveDateTime;
use serde::Serialize;

/// Run-scoped batch identity. Only ever logged, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ImportBatch {
    pub tag: String,
    pub year: i32,
    pub started_at: NaiveDateTime,
}

impl ImportBatch {
    pub fn start(prefix: &str, year: i32, started_at: NaiveDateTime) -> Self {
        Self {
            tag: format!("{}_{}", prefix, started_at.format("%Y%m%d_%H%M%S")),
            year,
            started_at,
        }
    }
}

/// Result of handing one row to the writer
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Inserted { affected: u64 },
    Rejected { reason: String },
}

impl RowOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, RowOutcome::Inserted { .. })
    }
}

/// Final summary of a run
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub batch_tag: String,
    pub year: i32,
    pub encoding: String,
    pub rows_read: usize,
    pub rows_skipped: usize,
    /// Lines whose value count differed from the header
    pub rows_ragged: usize,
    pub rows_inserted: u64,
    pub rows_rejected: u64,
    pub commits: u64,
    pub persisted_count: i64,
}

impl ImportReport {
    /// Persisted count for the year equals what this run reports inserting
    pub fn counts_match(&self) -> bool {
        self.persisted_count == self.rows_inserted as i64
    }
}
