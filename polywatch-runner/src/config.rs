//! Dashboard configuration loaded from TOML.
//!
//! Every section and field has a default, so an empty file (or no file at all)
//! yields a working configuration:
//!
//! ```toml
//! [engine]
//! horizon_days = 180
//!
//! [data]
//! path = "elite_data.csv"
//! repair_extreme_roi = true
//! extreme_roi_threshold = 100000.0
//!
//! [leaderboard]
//! rows_per_page = 20
//! sort_by = "roi"
//! min_roi = 0.0
//! min_balance = 0.0
//!
//! [cache]
//! ttl_secs = 600
//! max_entries = 1024
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use polywatch_core::DEFAULT_HORIZON_DAYS;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::leaderboard::SortKey;

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub engine: EngineSection,
    pub data: DataSection,
    pub leaderboard: LeaderboardSection,
    pub cache: CacheSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    /// Length of every synthesized history in days.
    pub horizon_days: usize,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSection {
    /// Wallet dataset (CSV).
    pub path: PathBuf,
    /// Recompute ROI from PnL and balance when the reported ROI is implausible.
    pub repair_extreme_roi: bool,
    /// ROI (percent) above which the repair applies.
    pub extreme_roi_threshold: f64,
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("elite_data.csv"),
            repair_extreme_roi: true,
            extreme_roi_threshold: 100_000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardSection {
    pub rows_per_page: usize,
    pub sort_by: SortKey,
    pub min_roi: f64,
    pub min_balance: f64,
}

impl Default for LeaderboardSection {
    fn default() -> Self {
        Self {
            rows_per_page: 20,
            sort_by: SortKey::Roi,
            min_roi: 0.0,
            min_balance: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    pub ttl_secs: u64,
    pub max_entries: usize,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_secs: 600,
            max_entries: 1024,
        }
    }
}

impl CacheSection {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl DashboardConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.horizon_days == 0 {
            return Err(ConfigError::Invalid(
                "engine.horizon_days must be at least 1".into(),
            ));
        }
        if self.leaderboard.rows_per_page == 0 {
            return Err(ConfigError::Invalid(
                "leaderboard.rows_per_page must be at least 1".into(),
            ));
        }
        if self.cache.max_entries == 0 {
            return Err(ConfigError::Invalid(
                "cache.max_entries must be at least 1".into(),
            ));
        }
        if !self.data.extreme_roi_threshold.is_finite() {
            return Err(ConfigError::Invalid(
                "data.extreme_roi_threshold must be finite".into(),
            ));
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
