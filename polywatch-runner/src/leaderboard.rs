//! Wallet leaderboard — filter, rank, and paginate tracked wallets.
//!
//! A [`ViewState`] describes what the reader is looking at (sort column,
//! filters, page). [`Leaderboard::page`] applies it in a fixed order:
//! filter → stable descending sort → paginate. A page past the end of the
//! filtered list snaps back to the first page.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::LeaderboardSection;
use crate::source::WalletRecord;

/// Column the leaderboard is ranked by (always descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Roi,
    Balance,
    Volume,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Roi, SortKey::Balance, SortKey::Volume];

    fn value(self, record: &WalletRecord) -> f64 {
        match self {
            SortKey::Roi => record.roi,
            SortKey::Balance => record.balance,
            SortKey::Volume => record.volume,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortKey::Roi => "roi",
            SortKey::Balance => "balance",
            SortKey::Volume => "volume",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key '{0}' (expected roi, balance, or volume)")]
pub struct ParseSortKeyError(String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "roi" => Ok(SortKey::Roi),
            "balance" | "bal" => Ok(SortKey::Balance),
            "volume" | "vol" => Ok(SortKey::Volume),
            _ => Err(ParseSortKeyError(s.to_string())),
        }
    }
}

/// What the reader is currently looking at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub sort_by: SortKey,
    /// Zero-based page index.
    pub page: usize,
    pub rows_per_page: usize,
    pub min_roi: f64,
    pub min_balance: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::from(&LeaderboardSection::default())
    }
}

impl From<&LeaderboardSection> for ViewState {
    fn from(section: &LeaderboardSection) -> Self {
        Self {
            sort_by: section.sort_by,
            page: 0,
            rows_per_page: section.rows_per_page.max(1),
            min_roi: section.min_roi,
            min_balance: section.min_balance,
        }
    }
}

impl ViewState {
    /// Switch the sort column. The page is left alone; [`Leaderboard::page`]
    /// snaps it back if it no longer exists.
    pub fn set_sort(&mut self, key: SortKey) {
        self.sort_by = key;
    }

    /// Advance one page if `page` is not the last one.
    pub fn next_page(&mut self, page: &LeaderboardPage) {
        if page.has_next() {
            self.page = page.page + 1;
        }
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }
}

/// One ranked row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedWallet {
    /// One-based rank within the filtered, sorted list.
    pub rank: usize,
    pub wallet: WalletRecord,
}

/// A rendered page of the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardPage {
    pub rows: Vec<RankedWallet>,
    /// Zero-based index of the page actually shown.
    pub page: usize,
    pub total_pages: usize,
    /// Wallets passing the filters.
    pub matching: usize,
}

impl LeaderboardPage {
    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }
}

/// Summary figures shown above the table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadlineStats {
    pub top_roi: f64,
    pub total_volume: f64,
    pub wallets_tracked: usize,
}

/// All tracked wallets.
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    wallets: Vec<WalletRecord>,
}

impl Leaderboard {
    pub fn new(wallets: Vec<WalletRecord>) -> Self {
        Self { wallets }
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    pub fn wallets(&self) -> &[WalletRecord] {
        &self.wallets
    }

    /// Headline figures over every tracked wallet, ignoring filters.
    pub fn headline(&self) -> HeadlineStats {
        let top_roi = self
            .wallets
            .iter()
            .map(|w| w.roi)
            .filter(|r| !r.is_nan())
            .fold(None, |acc: Option<f64>, r| Some(acc.map_or(r, |a| a.max(r))))
            .unwrap_or(0.0);
        HeadlineStats {
            top_roi,
            total_volume: self.wallets.iter().map(|w| w.volume).sum(),
            wallets_tracked: self.wallets.len(),
        }
    }

    /// Wallets passing the view's filters, sorted descending by its key.
    ///
    /// The sort is stable, so ties keep dataset order. NaN values sort last.
    pub fn ranked(&self, view: &ViewState) -> Vec<&WalletRecord> {
        let mut rows: Vec<&WalletRecord> = self
            .wallets
            .iter()
            .filter(|w| w.roi >= view.min_roi && w.balance >= view.min_balance)
            .collect();
        let key = view.sort_by;
        rows.sort_by(|a, b| {
            let (va, vb) = (key.value(a), key.value(b));
            match (va.is_nan(), vb.is_nan()) {
                (true, true) => std::cmp::Ordering::Equal,
                (true, false) => std::cmp::Ordering::Greater,
                (false, true) => std::cmp::Ordering::Less,
                (false, false) => vb.total_cmp(&va),
            }
        });
        rows
    }

    /// Render the page the view points at.
    pub fn page(&self, view: &ViewState) -> LeaderboardPage {
        let ranked = self.ranked(view);
        let rpp = view.rows_per_page.max(1);
        let matching = ranked.len();
        let total_pages = total_pages(matching, rpp);

        let page = if view.page >= total_pages { 0 } else { view.page };
        let start = page * rpp;
        let end = start.saturating_add(rpp).min(matching);

        let rows = ranked[start.min(end)..end]
            .iter()
            .enumerate()
            .map(|(i, w)| RankedWallet {
                rank: start + i + 1,
                wallet: (*w).clone(),
            })
            .collect();

        LeaderboardPage {
            rows,
            page,
            total_pages,
            matching,
        }
    }
}

/// Page count for `len` rows, never less than one.
pub fn total_pages(len: usize, rows_per_page: usize) -> usize {
    len.div_ceil(rows_per_page.max(1)).max(1)
}
