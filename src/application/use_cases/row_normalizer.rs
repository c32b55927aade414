// ============================================================
// ROW NORMALIZER
// ============================================================
// SourceRecord -> TargetRow with per-field defaults

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::domain::ranking::{
    ObjectId, SourceRecord, TargetRow, CATEGORY_COLUMNS, CNAME_COLUMNS, ENAME_COLUMNS,
    OVERALL_SCORE_COLUMNS, RANK_COLUMNS,
};

/// A normalized row and whether its line was ragged
#[derive(Debug, Clone)]
pub struct NormalizedRow {
    pub row: TargetRow,
    /// Value count differed from the header; absent columns took their defaults
    pub ragged: bool,
}

pub struct RowNormalizer {
    year: i32,
}

impl RowNormalizer {
    pub fn new(year: i32) -> Self {
        Self { year }
    }

    /// Normalize one record. Every field has a default, so this never fails.
    /// Ragged lines keep every value that lines up with a header column.
    pub fn normalize(&self, record: &SourceRecord, now: NaiveDateTime) -> NormalizedRow {
        let ragged = record.is_ragged();
        if ragged {
            warn!(
                ordinal = record.ordinal,
                expected = record.header_count,
                found = record.field_count,
                data = %record.to_log_string(),
                "Ragged line, missing columns use defaults"
            );
        }

        let ranking = rank(record);
        let mut category_scores = [0.0; 10];
        for (slot, column) in category_scores.iter_mut().zip(CATEGORY_COLUMNS) {
            *slot = score(record, &[column]);
        }

        let row = TargetRow {
            id: ObjectId::new().to_hex(),
            school_id: String::new(),
            ranking,
            ranking_text: ranking.to_string(),
            prev_ranking: 0,
            school_cname: text(record, &CNAME_COLUMNS),
            school_ename: text(record, &ENAME_COLUMNS),
            year_time: self.year,
            update_date_time: now,
            legacy_metrics: [0.0; 9],
            overall_score: score(record, &OVERALL_SCORE_COLUMNS),
            country_id: String::new(),
            category_scores,
        };

        NormalizedRow { row, ragged }
    }
}

fn rank(record: &SourceRecord) -> i32 {
    let raw = record.first_non_empty(&RANK_COLUMNS);
    match raw.map(str::parse::<i32>) {
        Some(Ok(value)) => value,
        _ => {
            debug!(
                ordinal = record.ordinal,
                raw = raw.unwrap_or(""),
                "Rank missing or not an integer, using row position"
            );
            i32::try_from(record.ordinal).unwrap_or(i32::MAX)
        }
    }
}

fn text(record: &SourceRecord, columns: &[&str]) -> String {
    record
        .first_non_empty(columns)
        .map(str::to_string)
        .unwrap_or_default()
}

fn score(record: &SourceRecord, columns: &[&str]) -> f64 {
    record
        .first_non_empty(columns)
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::csv::CsvParser;
    use chrono::Local;
    use std::collections::HashSet;

    fn record(ordinal: usize, pairs: &[(&str, &str)]) -> SourceRecord {
        SourceRecord::new(
            ordinal,
            pairs.iter().map(|(h, _)| *h),
            pairs.iter().map(|(_, v)| *v),
        )
    }

    fn normalize(record: &SourceRecord) -> NormalizedRow {
        RowNormalizer::new(2024).normalize(record, Local::now().naive_local())
    }

    #[test]
    fn test_full_row() {
        let rec = record(
            1,
            &[
                ("ranking", "1"),
                ("school_cname", "清华大学"),
                ("school_ename", "Tsinghua University"),
                ("overall_score", "852.5"),
                ("school_level", "99.1"),
                ("international_competitiveness", "87"),
            ],
        );
        let normalized = normalize(&rec);
        let row = normalized.row;

        assert!(!normalized.ragged);
        assert_eq!(row.id.len(), 24);
        assert_eq!(row.ranking, 1);
        assert_eq!(row.ranking_text, "1");
        assert_eq!(row.prev_ranking, 0);
        assert_eq!(row.school_cname, "清华大学");
        assert_eq!(row.school_ename, "Tsinghua University");
        assert_eq!(row.year_time, 2024);
        assert_eq!(row.legacy_metrics, [0.0; 9]);
        assert_eq!(row.overall_score, 852.5);
        assert_eq!(row.country_id, "");
        assert_eq!(row.school_id, "");
        assert_eq!(row.category_score("school_level"), Some(99.1));
        assert_eq!(row.category_score("international_competitiveness"), Some(87.0));
        assert_eq!(row.category_score("serve_society"), Some(0.0));
    }

    #[test]
    fn test_rank_falls_back_to_ordinal() {
        let bad = normalize(&record(2, &[("ranking", "bad")])).row;
        assert_eq!(bad.ranking, 2);
        assert_eq!(bad.ranking_text, "2");

        let absent = normalize(&record(7, &[("school_cname", "X")])).row;
        assert_eq!(absent.ranking, 7);

        let ranged = normalize(&record(9, &[("ranking", "8-10")])).row;
        assert_eq!(ranged.ranking, 9);
    }

    #[test]
    fn test_rank_synonym() {
        let row = normalize(&record(5, &[("rank", " 12 ")])).row;
        assert_eq!(row.ranking, 12);
    }

    #[test]
    fn test_name_synonyms() {
        let row = normalize(&record(
            1,
            &[("school_cname", ""), ("cname", "北京大学"), ("ename", "Peking University")],
        ))
        .row;
        assert_eq!(row.school_cname, "北京大学");
        assert_eq!(row.school_ename, "Peking University");

        let unresolved = normalize(&record(1, &[("ranking", "1")])).row;
        assert_eq!(unresolved.school_cname, "");
        assert_eq!(unresolved.school_ename, "");
    }

    #[test]
    fn test_overall_score_defaults() {
        let synonym = normalize(&record(1, &[("total_score", "70.25")])).row;
        assert_eq!(synonym.overall_score, 70.25);

        let empty = normalize(&record(1, &[("overall_score", "")])).row;
        assert_eq!(empty.overall_score, 0.0);

        let garbage = normalize(&record(1, &[("overall_score", "n/a")])).row;
        assert_eq!(garbage.overall_score, 0.0);

        let non_finite = normalize(&record(1, &[("overall_score", "inf")])).row;
        assert_eq!(non_finite.overall_score, 0.0);
    }

    #[test]
    fn test_category_scores_default_to_zero() {
        let row = normalize(&record(
            1,
            &[
                ("school_level", ""),
                ("subject_level", "abc"),
                ("talent_training", "12.5"),
            ],
        ))
        .row;
        assert_eq!(row.category_score("school_level"), Some(0.0));
        assert_eq!(row.category_score("subject_level"), Some(0.0));
        assert_eq!(row.category_score("school_resources"), Some(0.0));
        assert_eq!(row.category_score("talent_training"), Some(12.5));
    }

    #[test]
    fn test_short_record_keeps_present_values() {
        let rec = SourceRecord::new(
            3,
            ["ranking", "school_cname", "overall_score", "school_level", "subject_level"],
            ["3", "C", "70", "88"],
        );
        let normalized = normalize(&rec);

        assert!(normalized.ragged);
        assert_eq!(normalized.row.ranking, 3);
        assert_eq!(normalized.row.school_cname, "C");
        assert_eq!(normalized.row.overall_score, 70.0);
        assert_eq!(normalized.row.category_score("school_level"), Some(88.0));
        assert_eq!(normalized.row.category_score("subject_level"), Some(0.0));
        assert_eq!(normalized.row.year_time, 2024);
    }

    #[test]
    fn test_trailing_comma_keeps_scores() {
        let parsed = CsvParser::new()
            .parse_content("ranking,school_cname,overall_score,school_level\n1,A,90,88,\n")
            .unwrap();
        let normalized = normalize(&parsed.records[0]);

        assert!(normalized.ragged);
        assert_eq!(normalized.row.ranking, 1);
        assert_eq!(normalized.row.overall_score, 90.0);
        assert_eq!(normalized.row.category_score("school_level"), Some(88.0));
    }

    #[test]
    fn test_exact_record_is_not_ragged() {
        let rec = record(1, &[("ranking", "1"), ("school_level", "5")]);
        assert!(!normalize(&rec).ragged);
    }

    #[test]
    fn test_identifiers_unique_across_batch() {
        let normalizer = RowNormalizer::new(2024);
        let now = Local::now().naive_local();
        let ids: HashSet<String> = (1..=500)
            .map(|i| normalizer.normalize(&record(i, &[("ranking", "1")]), now).row.id)
            .collect();
        assert_eq!(ids.len(), 500);
    }
}
