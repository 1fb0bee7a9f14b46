//! PolyWatch Runner — everything around the engine.
//!
//! This crate builds on `polywatch-core` to provide:
//! - TOML configuration with per-section defaults
//! - Wallet ingestion from loosely formatted CSV exports
//! - A bounded TTL cache of syntheses
//! - Leaderboard filtering, ranking, and pagination
//! - Trader reports and ad-hoc address scans
//! - Parallel batch evaluation and JSON/CSV export

pub mod batch;
pub mod cache;
pub mod config;
pub mod dataset;
pub mod export;
pub mod leaderboard;
pub mod report;
pub mod scan;
pub mod source;

pub use batch::{BatchEvaluator, BatchRow};
pub use cache::{CacheKey, CacheStats, SynthesisCache};
pub use config::{ConfigError, DashboardConfig};
pub use dataset::{load_wallets, parse_wallets, DatasetOptions, LoadError};
pub use export::{
    export_batch_csv, export_json, export_series_csv, import_json, load_batch, save_batch,
    ReportArtifact, SCHEMA_VERSION,
};
pub use leaderboard::{HeadlineStats, Leaderboard, LeaderboardPage, SortKey, ViewState};
pub use report::{RiskGrade, RiskLevel, TraderReport};
pub use scan::{analyze_address, analyze_address_as_of, AddressAnalysis};
pub use source::{load_required, CsvSource, SourceError, StaticSource, WalletRecord, WalletSource};
