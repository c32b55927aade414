// ============================================================
// RANKING DOMAIN LAYER
// ============================================================
// Core types for the ranking import: source records, target rows,
// run configuration and per-run bookkeeping.
// No I/O, no async.

mod import_batch;
mod import_config;
mod object_id;
mod source_record;
mod target_row;

pub use import_batch::{ImportBatch, ImportReport, RowOutcome};
pub use import_config::ImportConfig;
pub use object_id::ObjectId;
pub use source_record::SourceRecord;
pub use target_row::{TargetRow, CATEGORY_COLUMNS, LEGACY_METRIC_COLUMNS, TARGET_COLUMNS};

/// Primary and synonym header names for the logical rank field
pub const RANK_COLUMNS: [&str; 2] = ["ranking", "rank"];

/// Primary and synonym header names for the Chinese school name
pub const CNAME_COLUMNS: [&str; 2] = ["school_cname", "cname"];

/// Primary and synonym header names for the English school name
pub const ENAME_COLUMNS: [&str; 2] = ["school_ename", "ename"];

/// Primary and synonym header names for the overall score
pub const OVERALL_SCORE_COLUMNS: [&str; 2] = ["overall_score", "total_score"];
