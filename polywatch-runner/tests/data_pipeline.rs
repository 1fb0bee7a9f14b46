//! End-to-end: CSV export → wallets → leaderboard → reports → artifacts.
//!
//! Uses the `elite_sample.csv` fixture, which mixes currency formatting,
//! a blank display name, rows without ids, an implausible ROI, and an
//! unparsable ROI cell.

use std::path::PathBuf;

use chrono::NaiveDate;
use polywatch_runner::{
    load_batch, load_required, save_batch, BatchEvaluator, CsvSource, DashboardConfig,
    DatasetOptions, Leaderboard, SortKey, SynthesisCache, ViewState, WalletSource,
};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/elite_sample.csv")
}

fn end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 31).unwrap()
}

fn wallets() -> Vec<polywatch_runner::WalletRecord> {
    let source = CsvSource::new(fixture(), DatasetOptions::default());
    load_required(&source).unwrap()
}

#[test]
fn fixture_rows_are_normalised() {
    let w = wallets();
    assert_eq!(w.len(), 5, "rows without ids are dropped");

    let alpha = &w[0];
    assert_eq!(alpha.display_name, "alpha_whale");
    assert_eq!(alpha.roi, 1_250.0);
    assert_eq!(alpha.pnl, Some(12_500.0));
    assert_eq!(alpha.balance, 25_000.0);
    assert!(alpha.volume >= 5.0 * 25_000.0);

    let unnamed = &w[2];
    assert_eq!(unnamed.display_name, unnamed.link_id);
    assert!((unnamed.roi - 50.0).abs() < 1e-9, "extreme ROI repaired from PnL");

    let delta = w.iter().find(|r| r.display_name == "delta").unwrap();
    assert_eq!(delta.roi, 0.0);
}

#[test]
fn leaderboard_over_fixture() {
    let board = Leaderboard::new(wallets());
    let config = DashboardConfig::default();
    let view = ViewState::from(&config.leaderboard);
    let page = board.page(&view);

    let names: Vec<&str> = page.rows.iter().map(|r| r.wallet.display_name.as_str()).collect();
    assert_eq!(page.matching, 4, "negative ROI filtered out by min_roi = 0");
    assert_eq!(names[0], "alpha_whale");
    assert_eq!(names[2], "betabot");
    assert_eq!(names[3], "delta");
    assert_eq!(page.total_pages, 1);

    let headline = board.headline();
    assert_eq!(headline.top_roi, 1_250.0);
    assert_eq!(headline.wallets_tracked, 5);

    let mut by_balance = view.clone();
    by_balance.set_sort(SortKey::Balance);
    let first = &board.page(&by_balance).rows[0];
    assert_eq!(first.wallet.balance, 25_000.0);
}

#[test]
fn batch_reports_anchor_to_dataset_balances() {
    let w = wallets();
    let cache = SynthesisCache::default();
    let reports = BatchEvaluator::new(180, end()).evaluate_all(&w, Some(&cache));
    assert_eq!(reports.len(), w.len());
    for (report, wallet) in reports.iter().zip(&w) {
        let last = report.synthesis.series().last_equity().unwrap();
        assert!((last - wallet.balance).abs() <= wallet.balance * 1e-6);
        assert_eq!(report.synthesis.series().last_date(), Some(end()));
    }
    assert_eq!(cache.len(), w.len());
}

#[test]
fn batch_artifacts_round_trip_through_disk() {
    let w = wallets();
    let reports = BatchEvaluator::new(60, end()).evaluate_all(&w, None);
    let dir = tempfile::tempdir().unwrap();
    let out = save_batch(&reports, dir.path()).unwrap();

    let metrics = std::fs::read_to_string(out.join("metrics.csv")).unwrap();
    assert_eq!(metrics.lines().count(), w.len() + 1);

    let loaded = load_batch(&out).unwrap();
    assert_eq!(loaded.len(), w.len());
    assert_eq!(loaded[0].wallet, w[0]);
}

#[test]
fn csv_copied_to_temp_dir_loads_identically() {
    let dir = tempfile::tempdir().unwrap();
    let copy = dir.path().join("elite_data.csv");
    std::fs::copy(fixture(), &copy).unwrap();
    let source = CsvSource::new(&copy, DatasetOptions::default());
    assert_eq!(source.load().unwrap(), wallets());
}
