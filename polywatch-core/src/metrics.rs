//! Performance metrics — pure functions over returns, PnL, and equity.
//!
//! Return-based statistics (Sharpe) read the raw sampled daily returns.
//! Equity-based statistics (drawdown, win/loss, profit factor) read the
//! anchored series. Every degenerate case resolves to a fixed value instead
//! of NaN or infinity.

use serde::{Deserialize, Serialize};

use crate::domain::EquitySeries;

/// Calendar days per year used to annualise Sharpe.
pub const ANNUALIZATION_DAYS: f64 = 365.0;

/// Profit factor reported when there are no losses to divide by.
pub const PROFIT_FACTOR_SENTINEL: f64 = 99.0;

/// Summary statistics for one synthesized history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub sharpe: f64,
    pub profit_factor: f64,
    pub win_rate_pct: f64,
    /// Worst peak-to-trough decline in percent. Always <= 0.
    pub max_drawdown_pct: f64,
    pub avg_win: f64,
    /// Mean of non-positive days. Always <= 0.
    pub avg_loss: f64,
    pub expectancy: f64,
    pub start_balance: f64,
}

impl PerformanceMetrics {
    /// Compute every metric. `start_balance` is carried through for display.
    pub fn compute(daily_returns: &[f64], series: &EquitySeries, start_balance: f64) -> Self {
        let pnl = series.daily_pnl();
        let equity = series.equity();

        let win_rate_pct = win_rate_pct(&pnl);
        let avg_win = avg_win(&pnl);
        let avg_loss = avg_loss(&pnl);

        Self {
            sharpe: sharpe_ratio(daily_returns),
            profit_factor: profit_factor(&pnl),
            win_rate_pct,
            max_drawdown_pct: max_drawdown_pct(&equity),
            avg_win,
            avg_loss,
            expectancy: expectancy(avg_win, avg_loss, win_rate_pct),
            start_balance,
        }
    }
}

/// Compute metrics for a series. Alias kept for callers that prefer a free function.
pub fn compute_metrics(
    daily_returns: &[f64],
    series: &EquitySeries,
    start_balance: f64,
) -> PerformanceMetrics {
    PerformanceMetrics::compute(daily_returns, series, start_balance)
}

// ─── Individual metric functions ────────────────────────────────────

/// Share of days with strictly positive PnL, in percent.
///
/// Flat days (including the first day, which is always 0) are not wins.
pub fn win_rate_pct(daily_pnl: &[f64]) -> f64 {
    if daily_pnl.is_empty() {
        return 0.0;
    }
    let wins = daily_pnl.iter().filter(|&&p| p > 0.0).count();
    wins as f64 / daily_pnl.len() as f64 * 100.0
}

/// Mean of strictly positive days, 0 if there are none.
pub fn avg_win(daily_pnl: &[f64]) -> f64 {
    mean_where(daily_pnl, |p| p > 0.0)
}

/// Mean of non-positive days, 0 if there are none.
pub fn avg_loss(daily_pnl: &[f64]) -> f64 {
    mean_where(daily_pnl, |p| p <= 0.0)
}

/// `|sum(wins) / sum(losses)|`, or `PROFIT_FACTOR_SENTINEL` when losses sum to 0.
pub fn profit_factor(daily_pnl: &[f64]) -> f64 {
    // Both sums are scaled by 1/n so balances near f64::MAX stay finite.
    let n = daily_pnl.len() as f64;
    let gross_profit: f64 = daily_pnl.iter().filter(|&&p| p > 0.0).map(|p| p / n).sum();
    let gross_loss: f64 = daily_pnl.iter().filter(|&&p| p <= 0.0).map(|p| p / n).sum();
    if gross_loss == 0.0 {
        return PROFIT_FACTOR_SENTINEL;
    }
    (gross_profit / gross_loss).abs()
}

/// Annualised Sharpe: `mean / std * sqrt(365)` with population std.
///
/// Returns 0.0 when the returns have no dispersion (or there are none).
/// Dispersion below `1e-15` is summation noise and counts as none.
pub fn sharpe_ratio(daily_returns: &[f64]) -> f64 {
    let std = std_dev(daily_returns);
    if std < 1e-15 || !std.is_finite() {
        return 0.0;
    }
    mean_f64(daily_returns) / std * ANNUALIZATION_DAYS.sqrt()
}

/// Worst drawdown from the running peak, as a negative percentage.
///
/// Returns 0.0 for an empty or monotonically non-decreasing curve.
pub fn max_drawdown_pct(equity: &[f64]) -> f64 {
    let Some(&first) = equity.first() else {
        return 0.0;
    };
    let mut peak = first;
    let mut max_dd = 0.0_f64;
    for &eq in equity {
        if eq > peak {
            peak = eq;
        }
        if peak > 0.0 {
            let dd = (eq - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd * 100.0
}

/// Probability-weighted average outcome per day.
pub fn expectancy(avg_win: f64, avg_loss: f64, win_rate_pct: f64) -> f64 {
    let p = win_rate_pct / 100.0;
    avg_win * p - avg_loss.abs() * (1.0 - p)
}

// ─── Helpers ────────────────────────────────────────────────────────

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    values.iter().map(|v| v / n).sum()
}

/// Population standard deviation (divides by `n`).
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    // Work on values scaled into [-1, 1] so squared deviations cannot overflow.
    let scale = values.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return 0.0;
    }
    let scaled: Vec<f64> = values.iter().map(|v| v / scale).collect();
    let mean = mean_f64(&scaled);
    let n = values.len() as f64;
    let variance: f64 = scaled.iter().map(|v| (v - mean).powi(2) / n).sum();
    variance.sqrt() * scale
}

fn mean_where(values: &[f64], keep: impl Fn(f64) -> bool) -> f64 {
    let count = values.iter().filter(|&&v| keep(v)).count();
    if count == 0 {
        return 0.0;
    }
    let n = count as f64;
    values.iter().filter(|&&v| keep(v)).map(|v| v / n).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(equity: &[f64]) -> EquitySeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates: Vec<NaiveDate> = (0..equity.len())
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect();
        EquitySeries::from_equity(&dates, equity)
    }

    // ── Win rate ──

    #[test]
    fn win_rate_counts_first_zero_day_as_non_win() {
        let pnl = vec![0.0, 10.0, 20.0, -5.0];
        assert!((win_rate_pct(&pnl) - 50.0).abs() < 1e-12);
    }

    #[test]
    fn win_rate_empty() {
        assert_eq!(win_rate_pct(&[]), 0.0);
    }

    #[test]
    fn win_rate_all_winners() {
        assert_eq!(win_rate_pct(&[1.0, 2.0, 3.0]), 100.0);
    }

    // ── Averages ──

    #[test]
    fn averages_split_on_sign() {
        let pnl = vec![0.0, 10.0, 30.0, -6.0];
        assert!((avg_win(&pnl) - 20.0).abs() < 1e-12);
        // non-positive days: 0.0 and -6.0
        assert!((avg_loss(&pnl) - (-3.0)).abs() < 1e-12);
    }

    #[test]
    fn averages_without_members_are_zero() {
        assert_eq!(avg_win(&[-1.0, 0.0]), 0.0);
        assert_eq!(avg_loss(&[1.0, 2.0]), 0.0);
    }

    // ── Profit factor ──

    #[test]
    fn profit_factor_mixed() {
        let pnl = vec![0.0, 500.0, -200.0, 300.0];
        assert!((profit_factor(&pnl) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn profit_factor_all_positive_is_sentinel() {
        assert_eq!(profit_factor(&[5.0, 1.0, 2.0]), PROFIT_FACTOR_SENTINEL);
    }

    #[test]
    fn profit_factor_only_flat_losses_is_sentinel() {
        assert_eq!(profit_factor(&[0.0, 5.0, 0.0]), PROFIT_FACTOR_SENTINEL);
    }

    #[test]
    fn sums_near_f64_max_stay_finite() {
        let big = f64::MAX / 2.0;
        let pnl = [big, big, big, -big, 0.0];
        assert!(avg_win(&pnl).is_finite());
        assert!((avg_win(&pnl) / big - 1.0).abs() < 1e-12);
        assert!((profit_factor(&pnl) - 3.0).abs() < 1e-12);
        assert!(mean_f64(&pnl).is_finite());
        assert!(std_dev(&pnl).is_finite());
    }

    #[test]
    fn profit_factor_all_losers_is_zero() {
        assert_eq!(profit_factor(&[-5.0, -1.0]), 0.0);
    }

    // ── Sharpe ──

    #[test]
    fn sharpe_constant_returns_is_zero() {
        assert_eq!(sharpe_ratio(&[0.01; 50]), 0.0);
    }

    #[test]
    fn sharpe_empty_is_zero() {
        assert_eq!(sharpe_ratio(&[]), 0.0);
    }

    #[test]
    fn sharpe_known_value() {
        // mean 0.01, population std 0.01 → 1 * sqrt(365)
        let r = vec![0.0, 0.02, 0.0, 0.02];
        let expected = 365.0_f64.sqrt();
        assert!((sharpe_ratio(&r) - expected).abs() < 1e-9);
    }

    #[test]
    fn sharpe_sign_follows_mean() {
        let r = vec![-0.03, 0.01, -0.02, 0.0];
        assert!(sharpe_ratio(&r) < 0.0);
    }

    // ── Max drawdown ──

    #[test]
    fn max_drawdown_known() {
        let eq = vec![100_000.0, 110_000.0, 90_000.0, 95_000.0];
        let expected = (90_000.0 - 110_000.0) / 110_000.0 * 100.0;
        assert!((max_drawdown_pct(&eq) - expected).abs() < 1e-10);
    }

    #[test]
    fn max_drawdown_monotonic_is_zero() {
        let eq: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        assert_eq!(max_drawdown_pct(&eq), 0.0);
        assert_eq!(max_drawdown_pct(&[5.0, 5.0, 5.0]), 0.0);
    }

    #[test]
    fn max_drawdown_empty_and_single() {
        assert_eq!(max_drawdown_pct(&[]), 0.0);
        assert_eq!(max_drawdown_pct(&[42.0]), 0.0);
    }

    // ── Expectancy ──

    #[test]
    fn expectancy_weights_by_win_rate() {
        // 60% wins of +10, 40% losses of -5 → 6 - 2 = 4
        assert!((expectancy(10.0, -5.0, 60.0) - 4.0).abs() < 1e-12);
    }

    // ── Aggregate ──

    #[test]
    fn compute_on_constructed_series() {
        let s = series(&[100.0, 110.0, 105.0, 120.0]);
        let m = PerformanceMetrics::compute(&[0.1, -0.05, 0.14], &s, 100.0);
        assert!((m.win_rate_pct - 50.0).abs() < 1e-12);
        assert!((m.avg_win - 12.5).abs() < 1e-12);
        assert!((m.avg_loss - (-2.5)).abs() < 1e-12);
        assert!((m.profit_factor - 5.0).abs() < 1e-12);
        assert!(m.max_drawdown_pct < 0.0);
        assert_eq!(m.start_balance, 100.0);
        assert!(m.sharpe > 0.0);
    }

    #[test]
    fn compute_on_empty_series_is_all_zero() {
        let m = compute_metrics(&[], &EquitySeries::default(), 500.0);
        assert_eq!(m.sharpe, 0.0);
        assert_eq!(m.win_rate_pct, 0.0);
        assert_eq!(m.max_drawdown_pct, 0.0);
        assert_eq!(m.avg_win, 0.0);
        assert_eq!(m.avg_loss, 0.0);
        assert_eq!(m.expectancy, 0.0);
        assert_eq!(m.profit_factor, PROFIT_FACTOR_SENTINEL);
        assert_eq!(m.start_balance, 500.0);
    }
}
