use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::application::ImportRankingsUseCase;
use crate::domain::error::Result;
use crate::infrastructure::config::ConfigService;

pub async fn run() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = ConfigService::load().map_err(|err| {
        error!(error = %err, "Failed to load configuration");
        err
    })?;

    let report = ImportRankingsUseCase::new(config).execute().await.map_err(|err| {
        error!(error = %err, "Import failed");
        err
    })?;

    if report.counts_match() {
        info!(
            inserted = report.rows_inserted,
            persisted = report.persisted_count,
            "Reported and persisted row counts agree"
        );
    }
    Ok(())
}
