use std::time::Duration;

use async_trait::async_trait;
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::{Any, AnyPool, Transaction};
use tracing::{error, info, warn};

use super::RankingStore;
use crate::domain::error::{ImportError, Result};
use crate::domain::ranking::{ImportConfig, TargetRow, TARGET_COLUMNS};

/// SQL flavour of the destination, derived from the database URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Sqlite,
}

impl Dialect {
    pub fn from_url(url: &str) -> Self {
        if url.starts_with("sqlite:") {
            Dialect::Sqlite
        } else {
            Dialect::MySql
        }
    }
}

/// `RankingStore` over a single pooled connection
pub struct SqlRankingStore {
    pool: AnyPool,
    dialect: Dialect,
    table: String,
    insert_sql: String,
    tx: Option<Transaction<'static, Any>>,
}

impl SqlRankingStore {
    /// Connect and run the liveness probe
    pub async fn connect(config: &ImportConfig) -> Result<Self> {
        install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect(&config.database_url)
            .await
            .map_err(|e| {
                error!("Failed to connect to destination database: {}", e);
                ImportError::DatabaseError(format!(
                    "Failed to connect to destination database: {e}"
                ))
            })?;

        let store = Self::with_pool(pool, Dialect::from_url(&config.database_url), &config.table);
        store.probe().await?;
        Ok(store)
    }

    pub fn with_pool(pool: AnyPool, dialect: Dialect, table: &str) -> Self {
        Self {
            pool,
            dialect,
            table: table.to_string(),
            insert_sql: build_insert_sql(table),
            tx: None,
        }
    }

    async fn probe(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| ImportError::DatabaseError(format!("Connection check failed: {e}")))?;

        match self.current_database().await {
            Ok(Some(name)) => info!(database = %name, "Connected to destination database"),
            Ok(None) => info!(dialect = ?self.dialect, "Connected to destination database"),
            Err(e) => warn!(error = %e, "Could not read current database name"),
        }
        Ok(())
    }

    async fn current_database(&self) -> Result<Option<String>> {
        match self.dialect {
            Dialect::MySql => {
                let name: Option<String> = sqlx::query_scalar("SELECT DATABASE()")
                    .fetch_one(&self.pool)
                    .await?;
                Ok(name)
            }
            Dialect::Sqlite => Ok(None),
        }
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Roll back anything pending and release the connection
    pub async fn close(mut self) {
        if let Err(e) = self.rollback().await {
            error!(error = %e, "Rollback on close failed");
        }
        self.pool.close().await;
        info!("Database connection closed");
    }

    async fn transaction(&mut self) -> Result<&mut Transaction<'static, Any>> {
        if self.tx.is_none() {
            let tx = self.pool.begin().await.map_err(|e| {
                ImportError::DatabaseError(format!("Failed to begin transaction: {e}"))
            })?;
            self.tx = Some(tx);
        }
        self.tx
            .as_mut()
            .ok_or_else(|| ImportError::DatabaseError("Transaction unavailable".to_string()))
    }
}

#[async_trait]
impl RankingStore for SqlRankingStore {
    async fn table_exists(&mut self) -> Result<bool> {
        let sql = match self.dialect {
            Dialect::MySql => {
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = DATABASE() AND table_name = ?"
            }
            Dialect::Sqlite => "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        };
        let query = sqlx::query_scalar::<Any, i64>(sql).bind(self.table.clone());
        let count = match self.tx.as_mut() {
            Some(tx) => query.fetch_one(&mut **tx).await?,
            None => query.fetch_one(&self.pool).await?,
        };
        Ok(count > 0)
    }

    async fn insert(&mut self, row: &TargetRow) -> Result<u64> {
        let sql = self.insert_sql.clone();
        let mut query = sqlx::query::<Any>(&sql)
            .bind(row.id.as_str())
            .bind(row.school_id.as_str())
            .bind(row.ranking)
            .bind(row.ranking_text.as_str())
            .bind(row.prev_ranking)
            .bind(row.school_cname.as_str())
            .bind(row.school_ename.as_str())
            .bind(row.year_time)
            .bind(row.update_date_time_text());
        for value in row.legacy_metrics {
            query = query.bind(value);
        }
        query = query.bind(row.overall_score).bind(row.country_id.as_str());
        for value in row.category_scores {
            query = query.bind(value);
        }

        let tx = self.transaction().await?;
        let result = query
            .execute(&mut **tx)
            .await
            .map_err(|e| ImportError::DatabaseError(format!("Failed to insert ranking row: {e}")))?;
        Ok(result.rows_affected())
    }

    async fn commit(&mut self) -> Result<()> {
        // A failed commit drops the transaction, which rolls it back on the connection
        match self.tx.take() {
            Some(tx) => tx
                .commit()
                .await
                .map_err(|e| ImportError::DatabaseError(format!("Failed to commit: {e}"))),
            None => Ok(()),
        }
    }

    async fn rollback(&mut self) -> Result<()> {
        match self.tx.take() {
            Some(tx) => tx
                .rollback()
                .await
                .map_err(|e| ImportError::DatabaseError(format!("Failed to roll back: {e}"))),
            None => Ok(()),
        }
    }

    async fn count_for_year(&mut self, year: i32) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE year_time = ?", self.table);
        let query = sqlx::query_scalar::<Any, i64>(&sql).bind(year);
        let count = match self.tx.as_mut() {
            Some(tx) => query.fetch_one(&mut **tx).await?,
            None => query.fetch_one(&self.pool).await?,
        };
        Ok(count)
    }
}

fn build_insert_sql(table: &str) -> String {
    let placeholders = vec!["?"; TARGET_COLUMNS.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        TARGET_COLUMNS.join(", "),
        placeholders
    )
}

/// In-memory SQLite store with the destination schema applied
#[cfg(test)]
pub(crate) async fn memory_store() -> SqlRankingStore {
    const SCHEMA: &str = include_str!("../../../resources/schema/school_ranking_arwu_chinese.sql");

    install_default_drivers();
    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::query(SCHEMA).execute(&pool).await.unwrap();
    SqlRankingStore::with_pool(pool, Dialect::Sqlite, "school_ranking_arwu_chinese")
}
