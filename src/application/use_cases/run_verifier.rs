use tracing::{info, warn};

use crate::domain::error::Result;
use crate::infrastructure::db::RankingStore;

/// Persisted count for the run's year next to what the writer reported
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verification {
    pub reported: u64,
    pub persisted: i64,
}

impl Verification {
    pub fn counts_match(&self) -> bool {
        self.persisted == self.reported as i64
    }

    pub fn has_rows(&self) -> bool {
        self.persisted > 0
    }
}

/// Advisory post-import check. Never fails the run on a mismatch.
pub struct RunVerifier {
    year: i32,
}

impl RunVerifier {
    pub fn new(year: i32) -> Self {
        Self { year }
    }

    pub async fn verify<S: RankingStore>(&self, store: &mut S, reported: u64) -> Result<Verification> {
        let persisted = store.count_for_year(self.year).await?;
        let verification = Verification {
            reported,
            persisted,
        };

        info!(
            year = self.year,
            reported, persisted, "Import finished, comparing reported and persisted rows"
        );
        if !verification.counts_match() {
            // Earlier runs for the same year, failed commits or other writers
            warn!(
                year = self.year,
                reported,
                persisted,
                "Persisted row count differs from rows reported inserted"
            );
        }
        if verification.has_rows() {
            info!(year = self.year, "Data written to the database");
        } else {
            warn!(year = self.year, "No rows found in the database for this year");
        }

        Ok(verification)
    }
}
