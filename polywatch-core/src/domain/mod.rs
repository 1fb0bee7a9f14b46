//! Domain types shared by the synthesizer, the metrics calculator, and callers.

pub mod identity;
pub mod series;
pub mod summary;

pub use identity::{shorten_address, Identity};
pub use series::{DailyPoint, EquitySeries};
pub use summary::{
    effective_balance, safe_roi, PerformanceSummary, FALLBACK_BALANCE, MAX_ROI_PCT, MIN_ROI_PCT,
};
