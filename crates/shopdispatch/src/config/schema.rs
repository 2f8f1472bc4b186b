use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    pub sources: SourcesConfig,
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

fn default_refresh_interval_secs() -> u64 {
    300
}

impl Config {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Configured database path, or the per-user default location.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.database_path
            .clone()
            .or_else(crate::db::default_database_path)
    }
}

/// File paths for each source. Only the primary job table is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub order_jobs: PathBuf,
    #[serde(default)]
    pub labor_history: Option<PathBuf>,
    #[serde(default)]
    pub order_backlog: Option<PathBuf>,
    #[serde(default)]
    pub part_inventory: Option<PathBuf>,
    #[serde(default)]
    pub material_not_issued: Option<PathBuf>,
}
