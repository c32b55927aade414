// ============================================================
// IMPORT CONFIGURATION
// ============================================================
// Static settings fixed before a run starts

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

static TABLE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_]+$").expect("table name pattern is valid")
});

/// Configuration for one import run
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ImportConfig {
    /// Destination database URL (`mysql://...` or `sqlite:...`)
    #[validate(length(min = 1, message = "database_url must be set"))]
    pub database_url: String,

    /// CSV file to import
    #[validate(length(min = 1, message = "source_path must be set"))]
    pub source_path: String,

    /// Value written to `year_time` for every row (default: 2024)
    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,

    /// Successful inserts between commits (default: 50)
    #[validate(range(min = 1))]
    pub commit_threshold: u64,

    /// Encoding labels tried in order when decoding the source
    #[validate(length(min = 1, message = "at least one encoding is required"))]
    pub encodings: Vec<String>,

    /// Destination table
    #[validate(custom(function = "validate_table_name"))]
    pub table: String,

    /// Prefix of the run's batch tag
    pub batch_prefix: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            source_path: "chinese_university_rankings_2024.csv".to_string(),
            year: 2024,
            commit_threshold: 50,
            // UTF-8 ahead of GBK: GBK decodes most UTF-8 bytes without error.
            // `gb2312` is an alias of `gbk`; `ansi` is accepted as windows-1252.
            encodings: vec![
                "utf-8".to_string(),
                "gbk".to_string(),
                "gb18030".to_string(),
                "windows-1252".to_string(),
            ],
            table: "school_ranking_arwu_chinese".to_string(),
            batch_prefix: "import_chinese".to_string(),
        }
    }
}

fn validate_table_name(table: &str) -> Result<(), ValidationError> {
    if TABLE_NAME_RE.is_match(table) {
        Ok(())
    } else {
        Err(ValidationError::new("table must contain only letters, digits and underscores"))
    }
}
