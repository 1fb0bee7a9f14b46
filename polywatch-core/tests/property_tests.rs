//! Property tests for engine invariants.
//!
//! Uses proptest to verify, across the supported input domain:
//! 1. Anchoring: the last equity value equals the current balance
//! 2. Floor: no equity value drops below 1.0
//! 3. Length: the series has exactly `horizon_days` points
//! 4. Clamp equivalence: ROI beyond the cap renders like the cap
//! 5. Metric bounds: win rate in [0, 100], drawdown <= 0

use chrono::NaiveDate;
use polywatch_core::domain::{Identity, MAX_ROI_PCT};
use polywatch_core::synthesize_with_metrics_as_of;
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_identity() -> impl Strategy<Value = Identity> {
    "[0-9a-zA-Z]{1,42}".prop_map(Identity::from)
}

fn arb_balance() -> impl Strategy<Value = f64> {
    1.0..10_000_000.0_f64
}

fn arb_roi() -> impl Strategy<Value = f64> {
    -99.0..50_000.0_f64
}

fn arb_horizon() -> impl Strategy<Value = usize> {
    1..400_usize
}

fn end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn path_ends_at_current_balance(
        id in arb_identity(),
        balance in arb_balance(),
        roi in arb_roi(),
    ) {
        let s = synthesize_with_metrics_as_of(&id, balance, roi, 180, end());
        let last = s.series().last_equity().unwrap();
        prop_assert!((last - balance).abs() <= balance * 1e-6);
    }

    #[test]
    fn equity_respects_floor(
        id in arb_identity(),
        balance in arb_balance(),
        roi in arb_roi(),
    ) {
        let s = synthesize_with_metrics_as_of(&id, balance, roi, 180, end());
        for v in s.series().equity() {
            prop_assert!(v >= 1.0, "equity {} below floor", v);
            prop_assert!(v.is_finite());
        }
    }

    #[test]
    fn series_length_equals_horizon(
        id in arb_identity(),
        balance in arb_balance(),
        roi in arb_roi(),
        horizon in arb_horizon(),
    ) {
        let s = synthesize_with_metrics_as_of(&id, balance, roi, horizon, end());
        prop_assert_eq!(s.series().len(), horizon);
        prop_assert_eq!(s.path.daily_returns.len(), horizon);
        prop_assert_eq!(s.series().points()[0].daily_pnl, 0.0);
    }

    #[test]
    fn roi_above_cap_is_clamped(
        id in arb_identity(),
        balance in arb_balance(),
        excess in 0.0..1_000_000.0_f64,
    ) {
        let capped = synthesize_with_metrics_as_of(&id, balance, MAX_ROI_PCT, 120, end());
        let wild = synthesize_with_metrics_as_of(&id, balance, MAX_ROI_PCT + excess, 120, end());
        prop_assert_eq!(capped, wild);
    }

    #[test]
    fn metrics_stay_in_bounds(
        id in arb_identity(),
        balance in arb_balance(),
        roi in arb_roi(),
    ) {
        let m = synthesize_with_metrics_as_of(&id, balance, roi, 180, end()).metrics;
        prop_assert!((0.0..=100.0).contains(&m.win_rate_pct));
        prop_assert!(m.max_drawdown_pct <= 0.0);
        prop_assert!(m.sharpe.is_finite());
        prop_assert!(m.expectancy.is_finite());
        prop_assert!(m.profit_factor >= 0.0);
    }

    #[test]
    fn zero_drawdown_only_for_non_decreasing_curves(
        id in arb_identity(),
        balance in arb_balance(),
        roi in arb_roi(),
        horizon in 1..20_usize,
    ) {
        let s = synthesize_with_metrics_as_of(&id, balance, roi, horizon, end());
        if s.metrics.max_drawdown_pct == 0.0 {
            let eq = s.series().equity();
            prop_assert!(eq.windows(2).all(|w| w[1] >= w[0]));
        }
    }

    #[test]
    fn repeated_runs_are_identical(
        id in arb_identity(),
        balance in arb_balance(),
        roi in arb_roi(),
    ) {
        let a = synthesize_with_metrics_as_of(&id, balance, roi, 60, end());
        let b = synthesize_with_metrics_as_of(&id, balance, roi, 60, end());
        prop_assert_eq!(a, b);
    }
}
