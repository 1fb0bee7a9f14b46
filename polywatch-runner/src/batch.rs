//! Batch evaluation of many wallets.
//!
//! Every wallet is independent, so evaluation fans out on the rayon pool.
//! Output order always matches input order.

use std::sync::Arc;

use chrono::NaiveDate;
use polywatch_core::synthesize_with_metrics_as_of;
use rayon::prelude::*;
use serde::Serialize;

use crate::cache::SynthesisCache;
use crate::report::TraderReport;
use crate::source::WalletRecord;

/// Runs the engine over a wallet list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchEvaluator {
    horizon_days: usize,
    as_of: NaiveDate,
    parallel: bool,
}

impl BatchEvaluator {
    pub fn new(horizon_days: usize, as_of: NaiveDate) -> Self {
        Self {
            horizon_days,
            as_of,
            parallel: true,
        }
    }

    /// Evaluator for histories ending today.
    pub fn today(horizon_days: usize) -> Self {
        Self::new(horizon_days, chrono::Local::now().date_naive())
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn horizon_days(&self) -> usize {
        self.horizon_days
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    fn evaluate_one(&self, record: &WalletRecord, cache: Option<&SynthesisCache>) -> TraderReport {
        let identity = record.identity();
        let synthesis = match cache {
            Some(c) => c.get_or_compute_as_of(
                &identity,
                record.balance,
                record.roi,
                self.horizon_days,
                self.as_of,
            ),
            None => Arc::new(synthesize_with_metrics_as_of(
                &identity,
                record.balance,
                record.roi,
                self.horizon_days,
                self.as_of,
            )),
        };
        TraderReport::new(record.clone(), synthesis)
    }

    /// Evaluate every record, reusing cached syntheses when a cache is given.
    pub fn evaluate_all(
        &self,
        records: &[WalletRecord],
        cache: Option<&SynthesisCache>,
    ) -> Vec<TraderReport> {
        tracing::debug!(
            wallets = records.len(),
            horizon_days = self.horizon_days,
            parallel = self.parallel,
            "evaluating wallets"
        );
        if self.parallel {
            records
                .par_iter()
                .map(|r| self.evaluate_one(r, cache))
                .collect()
        } else {
            records.iter().map(|r| self.evaluate_one(r, cache)).collect()
        }
    }
}

/// Flat per-wallet row for tabular output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRow {
    pub link_id: String,
    pub display_name: String,
    pub balance: f64,
    pub roi: f64,
    pub start_balance: f64,
    pub all_time_pnl: f64,
    pub sharpe: f64,
    pub profit_factor: f64,
    pub win_rate_pct: f64,
    pub max_drawdown_pct: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub expectancy: f64,
    pub risk_level: String,
}

impl From<&TraderReport> for BatchRow {
    fn from(report: &TraderReport) -> Self {
        let m = &report.synthesis.metrics;
        Self {
            link_id: report.wallet.link_id.clone(),
            display_name: report.wallet.display_name.clone(),
            balance: report.wallet.balance,
            roi: report.wallet.roi,
            start_balance: m.start_balance,
            all_time_pnl: report.all_time_pnl(),
            sharpe: m.sharpe,
            profit_factor: m.profit_factor,
            win_rate_pct: m.win_rate_pct,
            max_drawdown_pct: m.max_drawdown_pct,
            avg_win: m.avg_win,
            avg_loss: m.avg_loss,
            expectancy: m.expectancy,
            risk_level: report.risk_level().to_string(),
        }
    }
}
