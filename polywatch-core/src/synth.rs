//! Synthetic equity paths anchored to a known terminal balance.
//!
//! Given today's balance and the cumulative ROI, the synthesizer:
//! 1. Derives the implied start balance and the geometric daily growth rate
//! 2. Samples one normal daily return per day from an identity-seeded generator
//! 3. Compounds the returns from the start balance, flooring equity at 1.0
//! 4. Rescales the path with a linear ramp so it ends exactly at today's balance
//!
//! The same `(identity, balance, roi, horizon)` always produces the same values.
//! Only the date column depends on the chosen end date.

use chrono::{Duration, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::{DailyPoint, EquitySeries, Identity, PerformanceSummary};
use crate::seed::IdentitySeeder;

/// Default history length in calendar days.
pub const DEFAULT_HORIZON_DAYS: usize = 180;

/// Daily volatility never drops below this, so flat wallets still show noise.
pub const MIN_DAILY_VOLATILITY: f64 = 0.02;

/// Volatility as a multiple of the absolute daily growth rate.
pub const VOLATILITY_MULTIPLE: f64 = 3.0;

/// Simulated equity never falls below this value.
pub const EQUITY_FLOOR: f64 = 1.0;

/// Parameters derived from a wallet summary before any sampling happens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathParams {
    /// Balance after the fallback rule.
    pub current_balance: f64,
    /// ROI after clamping.
    pub safe_roi: f64,
    pub total_multiplier: f64,
    pub start_balance: f64,
    pub daily_growth: f64,
    pub volatility: f64,
}

impl PathParams {
    pub fn derive(summary: &PerformanceSummary, horizon_days: usize) -> Self {
        let (current_balance, safe_roi) = summary.sanitized();
        let total_multiplier = 1.0 + safe_roi / 100.0;
        // A tiny multiplier can push the quotient past f64::MAX.
        let start_balance = (current_balance / total_multiplier).min(f64::MAX);
        let daily_growth = if horizon_days == 0 {
            0.0
        } else {
            total_multiplier.powf(1.0 / horizon_days as f64) - 1.0
        };
        let volatility = MIN_DAILY_VOLATILITY.max(VOLATILITY_MULTIPLE * daily_growth.abs());
        Self {
            current_balance,
            safe_roi,
            total_multiplier,
            start_balance,
            daily_growth,
            volatility,
        }
    }
}

/// Normal distribution sampled with the Box-Muller transform.
#[derive(Debug, Clone, Copy)]
pub struct NormalSampler {
    pub mean: f64,
    pub std_dev: f64,
}

impl NormalSampler {
    pub fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        // u1 in (0, 1] keeps ln(u1) finite.
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = rng.gen();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        self.mean + self.std_dev * z
    }

    pub fn sample_n<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.sample(rng)).collect()
    }
}

/// Output of one synthesis: the anchored series plus what produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedPath {
    pub identity: Identity,
    pub seed: u64,
    pub params: PathParams,
    /// Raw sampled daily returns, before compounding and anchoring.
    pub daily_returns: Vec<f64>,
    pub series: EquitySeries,
}

impl SynthesizedPath {
    pub fn start_balance(&self) -> f64 {
        self.params.start_balance
    }

    pub fn horizon_days(&self) -> usize {
        self.series.len()
    }
}

/// Generates anchored equity paths of a fixed horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSynthesizer {
    horizon_days: usize,
}

impl Default for PathSynthesizer {
    fn default() -> Self {
        Self::new(DEFAULT_HORIZON_DAYS)
    }
}

impl PathSynthesizer {
    pub fn new(horizon_days: usize) -> Self {
        Self { horizon_days }
    }

    pub fn horizon_days(&self) -> usize {
        self.horizon_days
    }

    /// Synthesize a path whose last point is dated today (local time).
    pub fn synthesize(
        &self,
        identity: &Identity,
        current_balance: f64,
        roi_pct: f64,
    ) -> SynthesizedPath {
        let today = chrono::Local::now().date_naive();
        self.synthesize_as_of(identity, current_balance, roi_pct, today)
    }

    /// Synthesize a path whose last point is dated `end_date`.
    pub fn synthesize_as_of(
        &self,
        identity: &Identity,
        current_balance: f64,
        roi_pct: f64,
        end_date: NaiveDate,
    ) -> SynthesizedPath {
        let horizon = self.horizon_days;
        let params = PathParams::derive(&PerformanceSummary::new(current_balance, roi_pct), horizon);
        let seed = IdentitySeeder::seed(identity);

        tracing::trace!(
            identity = %identity,
            seed,
            start_balance = params.start_balance,
            daily_growth = params.daily_growth,
            volatility = params.volatility,
            "derived synthesis parameters"
        );

        let mut rng = IdentitySeeder::rng_for(identity);
        let daily_returns =
            NormalSampler::new(params.daily_growth, params.volatility).sample_n(&mut rng, horizon);

        let raw = compound_with_floor(params.start_balance, &daily_returns);
        let equity = anchor_to_balance(&raw, params.current_balance);
        let series = EquitySeries::from_points(build_points(&equity, end_date));

        SynthesizedPath {
            identity: identity.clone(),
            seed,
            params,
            daily_returns,
            series,
        }
    }
}

/// Compound returns from `start`, clamping every step to `[EQUITY_FLOOR, f64::MAX]`.
///
/// The returned path has `returns.len() + 1` values; index 0 is `start`.
pub fn compound_with_floor(start: f64, returns: &[f64]) -> Vec<f64> {
    let mut path = Vec::with_capacity(returns.len() + 1);
    path.push(start);
    let mut prev = start;
    for r in returns {
        let next = (prev * (1.0 + r)).clamp(EQUITY_FLOOR, f64::MAX);
        path.push(next);
        prev = next;
    }
    path
}

/// Apply the linear anchoring ramp and drop the leading start point.
///
/// The factor runs from 1.0 at the start point to `target / last` at the final
/// point. Interior values are clamped to `[EQUITY_FLOOR, f64::MAX]`; the final
/// value is exactly `target`.
pub fn anchor_to_balance(raw: &[f64], target: f64) -> Vec<f64> {
    let steps = raw.len().saturating_sub(1);
    if steps == 0 {
        return Vec::new();
    }
    let ratio = target / raw[steps];
    (1..=steps)
        .map(|i| {
            if i == steps {
                target
            } else {
                let factor = 1.0 + (ratio - 1.0) * (i as f64 / steps as f64);
                (raw[i] * factor).clamp(EQUITY_FLOOR, f64::MAX)
            }
        })
        .collect()
}

fn build_points(equity: &[f64], end_date: NaiveDate) -> Vec<DailyPoint> {
    let n = equity.len();
    equity
        .iter()
        .enumerate()
        .map(|(i, &value)| DailyPoint {
            date: end_date - Duration::days((n - 1 - i) as i64),
            equity: value,
            daily_pnl: if i == 0 { 0.0 } else { value - equity[i - 1] },
        })
        .collect()
}
