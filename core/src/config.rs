use crate::schema::ColumnMapping;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Name of the sheet inside the database.
    pub sheet_name:     String,
    pub db_path:        String,
    /// Read cache lifetime. 0 disables caching.
    pub cache_ttl_secs: u64,
    pub columns:        ColumnMapping,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            sheet_name:     "Wartungsliste".into(),
            db_path:        "battery-check.db".into(),
            cache_ttl_secs: 60,
            columns:        ColumnMapping::default(),
        }
    }
}

impl TrackerConfig {
    /// Load from a JSON file. Missing keys fall back to defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: TrackerConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.columns.validate()?;
        Ok(config)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
