//! Single pure entry point: summary facts in, anchored history and metrics out.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{EquitySeries, Identity};
use crate::metrics::PerformanceMetrics;
use crate::synth::{PathSynthesizer, SynthesizedPath, DEFAULT_HORIZON_DAYS};

/// Everything a dashboard needs to render one wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synthesis {
    pub path: SynthesizedPath,
    pub metrics: PerformanceMetrics,
}

impl Synthesis {
    pub fn series(&self) -> &EquitySeries {
        &self.path.series
    }

    pub fn identity(&self) -> &Identity {
        &self.path.identity
    }

    fn from_path(path: SynthesizedPath) -> Self {
        let metrics =
            PerformanceMetrics::compute(&path.daily_returns, &path.series, path.start_balance());
        Self { path, metrics }
    }
}

/// Synthesize a history ending today and compute its metrics.
pub fn synthesize_with_metrics(
    identity: &Identity,
    current_balance: f64,
    roi_pct: f64,
    horizon_days: usize,
) -> Synthesis {
    let path = PathSynthesizer::new(horizon_days).synthesize(identity, current_balance, roi_pct);
    Synthesis::from_path(path)
}

/// Same as [`synthesize_with_metrics`] with an explicit final date.
pub fn synthesize_with_metrics_as_of(
    identity: &Identity,
    current_balance: f64,
    roi_pct: f64,
    horizon_days: usize,
    end_date: NaiveDate,
) -> Synthesis {
    let path = PathSynthesizer::new(horizon_days).synthesize_as_of(
        identity,
        current_balance,
        roi_pct,
        end_date,
    );
    Synthesis::from_path(path)
}

/// [`synthesize_with_metrics`] over the default 180-day horizon.
pub fn synthesize_default(identity: &Identity, current_balance: f64, roi_pct: f64) -> Synthesis {
    synthesize_with_metrics(identity, current_balance, roi_pct, DEFAULT_HORIZON_DAYS)
}
