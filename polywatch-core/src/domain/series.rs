use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day of a wallet's equity curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub equity: f64,
    /// Change from the previous day's equity. Zero on the first day.
    pub daily_pnl: f64,
}

/// Chronologically ascending daily equity curve ending on its last date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquitySeries {
    points: Vec<DailyPoint>,
}

impl EquitySeries {
    /// Wrap points that already satisfy the ordering and first-day-zero rule.
    pub(crate) fn from_points(points: Vec<DailyPoint>) -> Self {
        Self { points }
    }

    /// Build a series from parallel date/equity columns, deriving daily PnL.
    ///
    /// The shorter column bounds the length. `daily_pnl[0]` is always 0.
    pub fn from_equity(dates: &[NaiveDate], equity: &[f64]) -> Self {
        let points = dates
            .iter()
            .zip(equity)
            .enumerate()
            .map(|(i, (&date, &value))| DailyPoint {
                date,
                equity: value,
                daily_pnl: if i == 0 { 0.0 } else { value - equity[i - 1] },
            })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[DailyPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn equity(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.equity).collect()
    }

    pub fn daily_pnl(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.daily_pnl).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    pub fn last_equity(&self) -> Option<f64> {
        self.points.last().map(|p| p.equity)
    }
}
