//! Wallet sources — the upstream side of the engine.
//!
//! A source yields one [`WalletRecord`] per tracked wallet. The engine only
//! needs `(identity, balance, roi)`; the remaining fields feed the leaderboard.

use std::path::{Path, PathBuf};

use polywatch_core::{Identity, PerformanceSummary};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::{load_wallets, DatasetOptions, LoadError};

/// Errors from a wallet source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("wallet source returned no wallets")]
    Empty,

    #[error(transparent)]
    Dataset(#[from] LoadError),
}

/// Normalised facts about one tracked wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletRecord {
    pub link_id: String,
    pub display_name: String,
    pub balance: f64,
    /// Cumulative ROI in percent.
    pub roi: f64,
    pub pnl: Option<f64>,
    pub volume: f64,
}

impl WalletRecord {
    pub fn new(link_id: impl Into<String>, balance: f64, roi: f64) -> Self {
        let link_id = link_id.into();
        Self {
            display_name: link_id.clone(),
            link_id,
            balance,
            roi,
            pnl: None,
            volume: 0.0,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn identity(&self) -> Identity {
        Identity::from(self.link_id.as_str())
    }

    pub fn summary(&self) -> PerformanceSummary {
        PerformanceSummary::new(self.balance, self.roi)
    }

    /// Display label with long addresses shortened.
    pub fn short_name(&self) -> String {
        polywatch_core::domain::shorten_address(&self.display_name)
    }
}

/// Anything that can supply the tracked wallet list.
pub trait WalletSource: Send + Sync {
    /// Short label for logs and errors.
    fn name(&self) -> &str;

    fn load(&self) -> Result<Vec<WalletRecord>, SourceError>;
}

/// Fixed in-memory wallet list.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<WalletRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<WalletRecord>) -> Self {
        Self { records }
    }
}

impl WalletSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn load(&self) -> Result<Vec<WalletRecord>, SourceError> {
        Ok(self.records.clone())
    }
}

/// Wallets read from a CSV export with loosely named columns.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    options: DatasetOptions,
}

impl CsvSource {
    pub fn new(path: impl AsRef<Path>, options: DatasetOptions) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            options,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WalletSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn load(&self) -> Result<Vec<WalletRecord>, SourceError> {
        Ok(load_wallets(&self.path, &self.options)?)
    }
}

/// Load from a source, treating an empty wallet list as an error.
pub fn load_required(source: &dyn WalletSource) -> Result<Vec<WalletRecord>, SourceError> {
    let records = source.load()?;
    if records.is_empty() {
        tracing::warn!(source = source.name(), "wallet source returned no wallets");
        return Err(SourceError::Empty);
    }
    tracing::info!(source = source.name(), wallets = records.len(), "loaded wallets");
    Ok(records)
}

/// Find a wallet by link id.
pub fn find_wallet<'a>(records: &'a [WalletRecord], link_id: &str) -> Option<&'a WalletRecord> {
    records.iter().find(|r| r.link_id == link_id)
}
