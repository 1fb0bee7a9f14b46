//! Quick-look analysis for arbitrary addresses that are not in the dataset.
//!
//! There is no on-chain lookup: balance and ROI are drawn from a generator
//! seeded by the address, so a given address always gets the same report.

use chrono::NaiveDate;
use polywatch_core::{synthesize_with_metrics_as_of, Identity, IdentitySeeder, Synthesis};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::report::RiskGrade;

pub const SCAN_BALANCE_RANGE: std::ops::Range<u64> = 5_000..500_000;
pub const SCAN_ROI_RANGE: std::ops::Range<f64> = -20.0..300.0;

/// Result of scanning one address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressAnalysis {
    pub address: Identity,
    pub estimated_balance: f64,
    pub realized_roi: f64,
    pub synthesis: Synthesis,
}

impl AddressAnalysis {
    pub fn grade(&self) -> RiskGrade {
        RiskGrade::from_drawdown(self.synthesis.metrics.max_drawdown_pct)
    }
}

/// Scan an address with a history ending today.
pub fn analyze_address(address: &str, horizon_days: usize) -> AddressAnalysis {
    analyze_address_as_of(address, horizon_days, chrono::Local::now().date_naive())
}

pub fn analyze_address_as_of(address: &str, horizon_days: usize, end_date: NaiveDate) -> AddressAnalysis {
    let identity = Identity::from(address.trim());
    let mut rng = IdentitySeeder::rng_for(&identity);
    let estimated_balance = rng.gen_range(SCAN_BALANCE_RANGE) as f64;
    let realized_roi = rng.gen_range(SCAN_ROI_RANGE);

    tracing::debug!(
        address = %identity,
        estimated_balance,
        realized_roi,
        "scanned address"
    );

    let synthesis =
        synthesize_with_metrics_as_of(&identity, estimated_balance, realized_roi, horizon_days, end_date);
    AddressAnalysis {
        address: identity,
        estimated_balance,
        realized_roi,
        synthesis,
    }
}
