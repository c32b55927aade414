pub mod ranking_store;

use async_trait::async_trait;

use crate::domain::error::Result;
use crate::domain::ranking::TargetRow;

pub use ranking_store::{Dialect, SqlRankingStore};

/// Destination table `school_ranking_arwu_chinese` as seen by the importer.
///
/// Writes go into an implicit transaction that is opened by the first insert
/// after a commit or rollback.
#[async_trait]
pub trait RankingStore: Send {
    /// Informational existence check of the destination table
    async fn table_exists(&mut self) -> Result<bool>;

    /// Insert one row, returning the number of affected rows
    async fn insert(&mut self, row: &TargetRow) -> Result<u64>;

    /// Make everything inserted since the last commit durable
    async fn commit(&mut self) -> Result<()>;

    /// Discard everything inserted since the last commit
    async fn rollback(&mut self) -> Result<()>;

    /// Rows persisted for a given `year_time`
    async fn count_for_year(&mut self, year: i32) -> Result<i64>;
}
