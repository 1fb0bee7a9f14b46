//! Per-wallet summary facts and the clamps applied before synthesis.

use serde::{Deserialize, Serialize};

/// Lower ROI bound (percent). Keeps the implied start balance finite.
pub const MIN_ROI_PCT: f64 = -99.0;

/// Upper ROI bound (percent).
pub const MAX_ROI_PCT: f64 = 50_000.0;

/// Balance substituted when the reported balance is zero, negative, or not finite.
pub const FALLBACK_BALANCE: f64 = 1_000.0;

/// The two facts known about a wallet: where it is now and how far it came.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub current_balance: f64,
    pub roi_pct: f64,
}

impl PerformanceSummary {
    pub fn new(current_balance: f64, roi_pct: f64) -> Self {
        Self {
            current_balance,
            roi_pct,
        }
    }

    /// Balance after the fallback rule.
    pub fn effective_balance(&self) -> f64 {
        effective_balance(self.current_balance)
    }

    /// ROI after clamping to `[MIN_ROI_PCT, MAX_ROI_PCT]`.
    pub fn safe_roi(&self) -> f64 {
        safe_roi(self.roi_pct)
    }

    /// `(effective_balance, safe_roi)` in one call.
    pub fn sanitized(&self) -> (f64, f64) {
        (self.effective_balance(), self.safe_roi())
    }

    /// Cumulative growth factor `1 + safe_roi / 100`. Always >= 0.01.
    pub fn total_multiplier(&self) -> f64 {
        1.0 + self.safe_roi() / 100.0
    }

    /// Balance the wallet must have started from to reach today's balance.
    ///
    /// Saturates at `f64::MAX` for balances near the top of the f64 range.
    pub fn implied_start_balance(&self) -> f64 {
        (self.effective_balance() / self.total_multiplier()).min(f64::MAX)
    }
}

/// Apply the balance fallback: non-positive or non-finite → `FALLBACK_BALANCE`.
pub fn effective_balance(current_balance: f64) -> f64 {
    if current_balance.is_finite() && current_balance > 0.0 {
        current_balance
    } else {
        FALLBACK_BALANCE
    }
}

/// Clamp ROI into the supported range. NaN is read as a flat 0 %.
pub fn safe_roi(roi_pct: f64) -> f64 {
    if roi_pct.is_nan() {
        return 0.0;
    }
    roi_pct.clamp(MIN_ROI_PCT, MAX_ROI_PCT)
}
