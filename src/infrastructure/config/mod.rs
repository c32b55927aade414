use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use tracing::info;
use validator::Validate;

use crate::domain::error::Result;
use crate::domain::ranking::ImportConfig;

/// Path of an alternative TOML config file
pub const ENV_CONFIG_PATH: &str = "RANKING_IMPORT_CONFIG";
/// Prefix of environment overrides, e.g. `RANKING_IMPORT_DATABASE_URL`
pub const ENV_PREFIX: &str = "RANKING_IMPORT_";
pub const DEFAULT_CONFIG_FILE: &str = "importer.toml";

pub struct ConfigService;

impl ConfigService {
    /// Defaults, then `importer.toml` (or `$RANKING_IMPORT_CONFIG`), then environment.
    /// `.env` is loaded into the environment first when present.
    pub fn load() -> Result<ImportConfig> {
        let _ = dotenvy::dotenv();
        let path = std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Result<ImportConfig> {
        let config: ImportConfig = Self::figment(path).extract()?;
        config.validate()?;

        info!(
            config_file = %path.display(),
            source = %config.source_path,
            year = config.year,
            commit_threshold = config.commit_threshold,
            table = %config.table,
            "Configuration loaded"
        );
        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(ImportConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["CONFIG"]))
    }
}
