// ============================================================
// IMPORT RANKINGS USE CASE
// ============================================================
// Resolve encoding -> parse -> normalize -> write -> verify

use std::path::Path;

use chrono::Local;
use tracing::{error, info, warn};

use super::batch_writer::BatchWriter;
use super::row_normalizer::RowNormalizer;
use super::run_verifier::RunVerifier;
use crate::domain::error::Result;
use crate::domain::ranking::{
    ImportBatch, ImportConfig, ImportReport, RowOutcome, CNAME_COLUMNS, RANK_COLUMNS,
};
use crate::infrastructure::csv::{CsvParser, EncodingResolver};
use crate::infrastructure::db::{RankingStore, SqlRankingStore};

pub struct ImportRankingsUseCase {
    config: ImportConfig,
}

impl ImportRankingsUseCase {
    pub fn new(config: ImportConfig) -> Self {
        Self { config }
    }

    /// Connect, import and verify. The connection is released on every path;
    /// on failure uncommitted rows are rolled back first.
    pub async fn execute(&self) -> Result<ImportReport> {
        let mut store = SqlRankingStore::connect(&self.config).await?;
        let result = self.import_or_rollback(&mut store).await;
        store.close().await;
        result
    }

    /// `import_into`, rolling back whatever is uncommitted when it fails
    pub async fn import_or_rollback<S: RankingStore>(&self, store: &mut S) -> Result<ImportReport> {
        let result = self.import_into(store).await;
        if let Err(e) = &result {
            error!(error = %e, "Import aborted, rolling back uncommitted rows");
            if let Err(rollback_err) = store.rollback().await {
                error!(error = %rollback_err, "Rollback failed");
            }
        }
        result
    }

    /// Run the import against an already connected store
    pub async fn import_into<S: RankingStore>(&self, store: &mut S) -> Result<ImportReport> {
        let config = &self.config;
        let batch = ImportBatch::start(&config.batch_prefix, config.year, Local::now().naive_local());
        info!(
            batch = %batch.tag,
            year = batch.year,
            started_at = %batch.started_at,
            source = %config.source_path,
            "Starting ranking import"
        );

        match store.table_exists().await {
            Ok(exists) => info!(table = %config.table, exists, "Destination table check"),
            Err(e) => warn!(table = %config.table, error = %e, "Destination table check failed"),
        }

        let decoded = EncodingResolver::new(config.encodings.iter().cloned())
            .resolve(Path::new(&config.source_path))?;
        let parsed = CsvParser::new().parse_content(&decoded.text)?;
        info!(
            rows = parsed.records.len(),
            skipped = parsed.skipped,
            encoding = %decoded.label,
            "Source rows read"
        );

        let normalizer = RowNormalizer::new(config.year);
        let mut writer = BatchWriter::new(&mut *store, config.commit_threshold);
        let mut ragged = 0;
        let mut rejected = 0;

        for record in &parsed.records {
            info!(
                ordinal = record.ordinal,
                ranking = record.first_non_empty(&RANK_COLUMNS).unwrap_or("N/A"),
                school = record.first_non_empty(&CNAME_COLUMNS).unwrap_or("N/A"),
                "Processing row"
            );

            let normalized = normalizer.normalize(record, Local::now().naive_local());
            if normalized.ragged {
                ragged += 1;
            }
            if let RowOutcome::Rejected { .. } = writer.write(&normalized.row, record).await {
                rejected += 1;
            }
        }

        writer.finish().await;

        let inserted = writer.inserted();
        let commits = writer.commits();
        let verification = RunVerifier::new(config.year)
            .verify(writer.store(), inserted)
            .await?;

        let report = ImportReport {
            batch_tag: batch.tag,
            year: batch.year,
            encoding: decoded.label,
            rows_read: parsed.records.len(),
            rows_skipped: parsed.skipped,
            rows_ragged: ragged,
            rows_inserted: inserted,
            rows_rejected: rejected,
            commits,
            persisted_count: verification.persisted,
        };

        info!(
            batch = %report.batch_tag,
            read = report.rows_read,
            inserted = report.rows_inserted,
            rejected = report.rows_rejected,
            ragged = report.rows_ragged,
            commits = report.commits,
            persisted = report.persisted_count,
            "Import summary"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::batch_writer::tests::RecordingStore;
    use crate::domain::error::ImportError;
    use crate::domain::ranking::ObjectId;
    use crate::infrastructure::db::ranking_store::memory_store;
    use encoding_rs::GBK;
    use sqlx::Any;
    use std::fs;
    use std::path::PathBuf;

    struct TempCsv(PathBuf);

    impl TempCsv {
        fn new(bytes: &[u8]) -> Self {
            let path = std::env::temp_dir().join(format!("arwu-import-{}.csv", ObjectId::new()));
            fs::write(&path, bytes).unwrap();
            Self(path)
        }
    }

    impl Drop for TempCsv {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    fn config_for(csv: &TempCsv, commit_threshold: u64) -> ImportConfig {
        ImportConfig {
            database_url: "sqlite::memory:".to_string(),
            source_path: csv.0.to_string_lossy().into_owned(),
            commit_threshold,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_three_row_scenario() {
        let csv = TempCsv::new(
            "ranking,school_cname,overall_score\n1,A,90\nbad,B,\n3,C,70\n".as_bytes(),
        );
        let mut store = memory_store().await;

        let report = ImportRankingsUseCase::new(config_for(&csv, 50))
            .import_into(&mut store)
            .await
            .unwrap();

        assert_eq!(report.rows_read, 3);
        assert_eq!(report.rows_inserted, 3);
        assert_eq!(report.persisted_count, 3);
        assert!(report.counts_match());

        let rows: Vec<(i64, String, f64)> = sqlx::query_as::<Any, (i64, String, f64)>(
            "SELECT ranking, school_cname, overall_score FROM school_ranking_arwu_chinese ORDER BY ranking",
        )
        .fetch_all(store.pool())
        .await
        .unwrap();
        assert_eq!(
            rows,
            vec![
                (1, "A".to_string(), 90.0),
                (2, "B".to_string(), 0.0),
                (3, "C".to_string(), 70.0),
            ]
        );
    }

    #[tokio::test]
    async fn test_gbk_source_is_fully_ingested() {
        let (bytes, _, _) = GBK.encode(
            "ranking,school_cname,school_ename,total_score,school_level\n\
             1,清华大学,Tsinghua University,100,95.5\n\
             2,北京大学,Peking University,98,94\n\
             3,浙江大学,Zhejiang University,90,\n",
        );
        let csv = TempCsv::new(&bytes);
        let mut store = memory_store().await;

        let report = ImportRankingsUseCase::new(config_for(&csv, 2))
            .import_into(&mut store)
            .await
            .unwrap();

        assert_eq!(report.encoding, "gbk");
        assert_eq!(report.rows_read, 3);
        assert_eq!(report.rows_inserted, 3);
        assert_eq!(report.commits, 2);

        let names: Vec<String> = sqlx::query_scalar::<Any, String>(
            "SELECT school_cname FROM school_ranking_arwu_chinese ORDER BY ranking",
        )
        .fetch_all(store.pool())
        .await
        .unwrap();
        assert_eq!(names, vec!["清华大学", "北京大学", "浙江大学"]);
    }

    #[tokio::test]
    async fn test_rerun_duplicates_rows() {
        let csv = TempCsv::new(b"ranking,school_cname\n1,A\n2,B\n");
        let mut store = memory_store().await;
        let use_case = ImportRankingsUseCase::new(config_for(&csv, 50));

        let first = use_case.import_into(&mut store).await.unwrap();
        let second = use_case.import_into(&mut store).await.unwrap();

        assert_eq!(first.persisted_count, 2);
        assert_eq!(second.rows_inserted, 2);
        assert_eq!(second.persisted_count, 4);
        assert!(!second.counts_match());

        let distinct: i64 = sqlx::query_scalar::<Any, i64>(
            "SELECT COUNT(DISTINCT id) FROM school_ranking_arwu_chinese",
        )
        .fetch_one(store.pool())
        .await
        .unwrap();
        assert_eq!(distinct, 4);
    }

    #[tokio::test]
    async fn test_insert_failures_are_counted_not_fatal() {
        let csv = TempCsv::new(b"ranking,school_cname\n1,A\n2,A\n3,B\n4,A\n");
        let mut store = memory_store().await;
        sqlx::query::<Any>(
            "CREATE UNIQUE INDEX ux_ranking_cname ON school_ranking_arwu_chinese (school_cname)",
        )
        .execute(store.pool())
        .await
        .unwrap();

        let report = ImportRankingsUseCase::new(config_for(&csv, 1))
            .import_into(&mut store)
            .await
            .unwrap();

        assert_eq!(report.rows_read, 4);
        assert_eq!(report.rows_inserted, 2);
        assert_eq!(report.rows_rejected, 2);
        assert_eq!(report.persisted_count, 2);
    }

    #[tokio::test]
    async fn test_unreadable_source_writes_nothing() {
        let mut store = memory_store().await;
        let config = ImportConfig {
            database_url: "sqlite::memory:".to_string(),
            source_path: "/nonexistent/rankings.csv".to_string(),
            ..Default::default()
        };

        let err = ImportRankingsUseCase::new(config)
            .import_into(&mut store)
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::UnreadableSource(_)));
        assert_eq!(store.count_for_year(2024).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_execute_without_destination_table_fails_after_release() {
        let csv = TempCsv::new(b"ranking,school_cname\n1,A\n");
        let err = ImportRankingsUseCase::new(config_for(&csv, 50))
            .execute()
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn test_verification_runs_after_failed_commit() {
        let csv = TempCsv::new(b"ranking,school_cname\n1,A\n2,B\n3,C\n");
        let mut store = RecordingStore {
            fail_commit_at: Some(1),
            ..Default::default()
        };

        let report = ImportRankingsUseCase::new(config_for(&csv, 2))
            .import_into(&mut store)
            .await
            .unwrap();

        assert_eq!(report.rows_inserted, 3);
        assert_eq!(report.commits, 1);
        assert_eq!(store.rollbacks, 1);
        // Only the row after the failed window survived
        assert_eq!(report.persisted_count, 1);
        assert!(!report.counts_match());
    }

    #[tokio::test]
    async fn test_ragged_lines_are_counted_and_kept() {
        let csv = TempCsv::new(b"ranking,school_cname,school_level\n1,A,88,\n2,B\n");
        let mut store = RecordingStore::default();

        let report = ImportRankingsUseCase::new(config_for(&csv, 50))
            .import_into(&mut store)
            .await
            .unwrap();

        assert_eq!(report.rows_ragged, 2);
        assert_eq!(report.rows_inserted, 2);
        assert_eq!(store.committed[0].category_score("school_level"), Some(88.0));
    }

    #[tokio::test]
    async fn test_failed_verification_rolls_back() {
        let csv = TempCsv::new(b"ranking,school_cname\n1,A\n2,B\n");
        let mut store = RecordingStore {
            fail_count: true,
            ..Default::default()
        };

        let err = ImportRankingsUseCase::new(config_for(&csv, 50))
            .import_or_rollback(&mut store)
            .await
            .unwrap_err();

        assert!(matches!(err, ImportError::DatabaseError(_)));
        assert_eq!(store.rollbacks, 1);
        assert!(store.pending.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_source_rolls_back_before_writes() {
        let mut store = RecordingStore::default();
        let config = ImportConfig {
            database_url: "sqlite::memory:".to_string(),
            source_path: "/nonexistent/rankings.csv".to_string(),
            ..Default::default()
        };

        let err = ImportRankingsUseCase::new(config)
            .import_or_rollback(&mut store)
            .await
            .unwrap_err();

        assert!(matches!(err, ImportError::UnreadableSource(_)));
        assert_eq!(store.rollbacks, 1);
        assert_eq!(store.commit_calls, 0);
        assert!(store.committed.is_empty());
    }
}
