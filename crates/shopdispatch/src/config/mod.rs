pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_from_str};
pub use schema::{Config, SourcesConfig};

use std::path::PathBuf;

/// Returns the canonical config path: `~/.shopdispatch/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".shopdispatch").join("config.json"))
}
