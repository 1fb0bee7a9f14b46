//! Wallet dataset ingestion from loosely formatted CSV exports.
//!
//! Exports from different tools name their columns differently ("Proxy Wallet",
//! "wallet_address", "Total Balance ($)"...). Headers are normalised to
//! lowercase alphanumerics and matched against keyword rules, checked in order:
//!
//! | field          | header contains any of              |
//! |----------------|-------------------------------------|
//! | `link_id`      | `wallet`, `address`, `id`           |
//! | `display_name` | `user`, `name`, `display`           |
//! | `roi`          | `roi`, `return`, `yield`, `apru`    |
//! | `pnl`          | `profit`, `pnl`, `earnings`         |
//! | `balance`      | `bal`, `val`, `total`, `equity`     |
//! | `volume`       | `vol`, `turnover`, `traded`         |
//!
//! The first column that maps to a field wins; later duplicates are ignored.
//! Missing fields are filled in:
//! 1. `link_id` ← `display_name` ← first column
//! 2. `roi` ← `pnl / (balance - pnl) * 100` when PnL is known, else 0
//! 3. `volume` ← `balance * (seed(link_id) % 20 + 5)`
//!
//! Rows without a usable link id are dropped.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use polywatch_core::{Identity, IdentitySeeder};
use thiserror::Error;

use crate::config::DataSection;
use crate::source::WalletRecord;

/// Errors from the dataset layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open dataset '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset has no columns")]
    NoColumns,
}

/// Options controlling how rows are cleaned.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetOptions {
    /// Recompute ROI from PnL when the reported ROI exceeds the threshold.
    pub repair_extreme_roi: bool,
    pub extreme_roi_threshold: f64,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self::from(&DataSection::default())
    }
}

impl From<&DataSection> for DatasetOptions {
    fn from(section: &DataSection) -> Self {
        Self {
            repair_extreme_roi: section.repair_extreme_roi,
            extreme_roi_threshold: section.extreme_roi_threshold,
        }
    }
}

/// Canonical fields recognised in wallet exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    LinkId,
    DisplayName,
    Roi,
    Pnl,
    Balance,
    Volume,
}

const COLUMN_RULES: &[(Field, &[&str])] = &[
    (Field::LinkId, &["wallet", "address", "id"]),
    (Field::DisplayName, &["user", "name", "display"]),
    (Field::Roi, &["roi", "return", "yield", "apru"]),
    (Field::Pnl, &["profit", "pnl", "earnings"]),
    (Field::Balance, &["bal", "val", "total", "equity"]),
    (Field::Volume, &["vol", "turnover", "traded"]),
];

/// Lowercase and drop everything outside `[a-z0-9]`.
pub fn normalize_header(header: &str) -> String {
    header
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Field a normalised header maps to, if any.
pub fn classify_header(normalized: &str) -> Option<Field> {
    COLUMN_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| normalized.contains(k)))
        .map(|(field, _)| *field)
}

/// Column index per recognised field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    columns: HashMap<Field, usize>,
}

impl ColumnMap {
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut columns = HashMap::new();
        for (idx, header) in headers.iter().enumerate() {
            if let Some(field) = classify_header(&normalize_header(header.as_ref())) {
                columns.entry(field).or_insert(idx);
            }
        }
        Self { columns }
    }

    pub fn get(&self, field: Field) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    pub fn has(&self, field: Field) -> bool {
        self.columns.contains_key(&field)
    }
}

/// Parse a numeric cell, tolerating `$`, `%`, and thousands separators.
///
/// Anything unparsable or non-finite reads as 0.0.
pub fn clean_number(raw: &str) -> f64 {
    let stripped: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | '%' | ','))
        .collect();
    match stripped.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// ROI implied by realised PnL on the balance it grew from.
pub fn roi_from_pnl(pnl: f64, balance: f64) -> f64 {
    let base = balance - pnl;
    if base == 0.0 {
        0.0
    } else {
        pnl / base * 100.0
    }
}

/// Synthetic volume for exports that lack one: 5x to 24x the balance.
pub fn estimated_volume(link_id: &str, balance: f64) -> f64 {
    let multiple = IdentitySeeder::seed(&Identity::from(link_id)) % 20 + 5;
    balance * multiple as f64
}

/// Load and normalise wallets from a CSV file.
pub fn load_wallets(path: &Path, opts: &DatasetOptions) -> Result<Vec<WalletRecord>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "reading wallet dataset");
    parse_wallets(file, opts)
}

/// Parse and normalise wallets from any CSV reader.
pub fn parse_wallets<R: Read>(reader: R, opts: &DatasetOptions) -> Result<Vec<WalletRecord>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::NoColumns);
    }
    let map = ColumnMap::from_headers(&headers);
    tracing::debug!(?map, "mapped dataset columns");

    // Fallback identity column when no wallet/address/id column exists.
    let link_col = map
        .get(Field::LinkId)
        .or_else(|| map.get(Field::DisplayName))
        .unwrap_or(0);

    let mut records = Vec::new();
    let mut dropped = 0usize;
    let mut repaired = 0usize;

    for row in rdr.records() {
        let row = row?;
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        let link_id = cell(link_col).to_string();
        if link_id.is_empty() || link_id.eq_ignore_ascii_case("nan") {
            dropped += 1;
            continue;
        }

        let display_name = map
            .get(Field::DisplayName)
            .map(|i| cell(i).to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| link_id.clone());

        let balance = map.get(Field::Balance).map_or(0.0, |i| clean_number(cell(i)));
        let pnl = map.get(Field::Pnl).map(|i| clean_number(cell(i)));

        let mut roi = match (map.get(Field::Roi), pnl) {
            (Some(i), _) => clean_number(cell(i)),
            (None, Some(p)) => roi_from_pnl(p, balance),
            (None, None) => 0.0,
        };

        if opts.repair_extreme_roi && roi > opts.extreme_roi_threshold {
            if let Some(p) = pnl {
                let fixed = roi_from_pnl(p, balance);
                tracing::debug!(link_id = %link_id, reported = roi, repaired = fixed, "repaired extreme ROI");
                roi = fixed;
                repaired += 1;
            }
        }

        let volume = match map.get(Field::Volume) {
            Some(i) => clean_number(cell(i)),
            None => estimated_volume(&link_id, balance),
        };

        records.push(WalletRecord {
            pnl,
            ..WalletRecord::new(link_id, balance, roi)
                .with_display_name(display_name)
                .with_volume(volume)
        });
    }

    if dropped > 0 {
        tracing::warn!(dropped, "dropped rows without a usable wallet id");
    }
    if repaired > 0 {
        tracing::info!(repaired, "recomputed extreme ROI values from PnL");
    }

    Ok(records)
}
