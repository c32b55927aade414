// ============================================================
// BATCH WRITER
// ============================================================
// Best-effort row insertion with threshold commits

use tracing::{error, info, warn};

use crate::domain::ranking::{RowOutcome, SourceRecord, TargetRow};
use crate::infrastructure::db::RankingStore;

/// Writes rows into a `RankingStore`, committing every `commit_threshold`
/// successful inserts. Insert failures come back as `RowOutcome::Rejected`
/// for the caller to tally, never as errors.
pub struct BatchWriter<'a, S: RankingStore> {
    store: &'a mut S,
    commit_threshold: u64,
    inserted: u64,
    commits: u64,
}

impl<'a, S: RankingStore> BatchWriter<'a, S> {
    pub fn new(store: &'a mut S, commit_threshold: u64) -> Self {
        Self {
            store,
            commit_threshold: commit_threshold.max(1),
            inserted: 0,
            commits: 0,
        }
    }

    /// Insert one row. `source` is only used for diagnostics.
    pub async fn write(&mut self, row: &TargetRow, source: &SourceRecord) -> RowOutcome {
        match self.store.insert(row).await {
            Ok(affected) => {
                self.inserted += affected;
                if affected > 0 && self.inserted % self.commit_threshold == 0 {
                    self.commit("threshold").await;
                }
                RowOutcome::Inserted { affected }
            }
            Err(e) => {
                error!(
                    ordinal = source.ordinal,
                    error = %e,
                    data = %source.to_log_string(),
                    "Failed to insert row"
                );
                RowOutcome::Rejected {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Final unconditional commit of whatever is pending.
    /// Returns whether the commit went through.
    pub async fn finish(&mut self) -> bool {
        self.commit("final").await
    }

    async fn commit(&mut self, kind: &str) -> bool {
        match self.store.commit().await {
            Ok(()) => {
                self.commits += 1;
                info!(kind, inserted = self.inserted, "Committed");
                true
            }
            Err(e) => {
                error!(kind, error = %e, "Commit failed, rolling back pending rows");
                match self.store.rollback().await {
                    Ok(()) => warn!(kind, "Rolled back uncommitted rows"),
                    Err(rollback_err) => error!(kind, error = %rollback_err, "Rollback failed"),
                }
                false
            }
        }
    }

    pub fn inserted(&self) -> u64 {
        self.inserted
    }

    pub fn commits(&self) -> u64 {
        self.commits
    }

    pub fn store(&mut self) -> &mut S {
        &mut *self.store
    }
}
