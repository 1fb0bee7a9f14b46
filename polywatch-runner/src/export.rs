//! Export — JSON and CSV artifacts for synthesized histories.
//!
//! - **JSON**: one wallet report with the full synthesis, schema-versioned
//! - **CSV**: daily equity series, and a per-wallet metrics table for batches
//!
//! Persisted JSON carries a `schema_version` field. Newer versions than this
//! build understands are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use polywatch_core::{EquitySeries, Synthesis};
use serde::{Deserialize, Serialize};

use crate::batch::BatchRow;
use crate::report::TraderReport;
use crate::source::WalletRecord;

pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Serialized form of a [`TraderReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportArtifact {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub wallet: WalletRecord,
    pub profile_url: String,
    pub all_time_pnl: f64,
    pub risk_level: String,
    pub synthesis: Synthesis,
}

impl From<&TraderReport> for ReportArtifact {
    fn from(report: &TraderReport) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            wallet: report.wallet.clone(),
            profile_url: report.profile_url(),
            all_time_pnl: report.all_time_pnl(),
            risk_level: report.risk_level().to_string(),
            synthesis: report.synthesis.as_ref().clone(),
        }
    }
}

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_json(report: &TraderReport) -> Result<String> {
    serde_json::to_string_pretty(&ReportArtifact::from(report))
        .context("failed to serialize report to JSON")
}

/// Parse a report artifact, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<ReportArtifact> {
    let artifact: ReportArtifact =
        serde_json::from_str(json).context("failed to deserialize report from JSON")?;
    if artifact.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            artifact.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(artifact)
}

// ─── CSV ────────────────────────────────────────────────────────────

/// Daily series with columns `date,equity,daily_pnl`.
pub fn export_series_csv(series: &EquitySeries) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "equity", "daily_pnl"])?;
    for p in series.points() {
        wtr.write_record([
            &p.date.format("%Y-%m-%d").to_string(),
            &format!("{:.2}", p.equity),
            &format!("{:.2}", p.daily_pnl),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// One row per wallet with headline metrics.
pub fn export_batch_csv(reports: &[TraderReport]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for report in reports {
        wtr.serialize(BatchRow::from(report))?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Write batch results under `output_dir`:
/// - `metrics.csv`: one row per wallet
/// - `reports.json`: every report with its full synthesis
///
/// Returns the directory written to.
pub fn save_batch(reports: &[TraderReport], output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let metrics = export_batch_csv(reports)?;
    let metrics_path = output_dir.join("metrics.csv");
    std::fs::write(&metrics_path, metrics)
        .with_context(|| format!("failed to write {}", metrics_path.display()))?;

    let artifacts: Vec<ReportArtifact> = reports.iter().map(ReportArtifact::from).collect();
    let json = serde_json::to_string_pretty(&artifacts).context("failed to serialize reports")?;
    let reports_path = output_dir.join("reports.json");
    std::fs::write(&reports_path, json)
        .with_context(|| format!("failed to write {}", reports_path.display()))?;

    tracing::info!(
        wallets = reports.len(),
        dir = %output_dir.display(),
        "saved batch artifacts"
    );
    Ok(output_dir.to_path_buf())
}

/// Load `reports.json` from a batch directory.
pub fn load_batch(dir: &Path) -> Result<Vec<ReportArtifact>> {
    let path = dir.join("reports.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let artifacts: Vec<ReportArtifact> =
        serde_json::from_str(&json).context("failed to deserialize batch reports")?;
    if let Some(bad) = artifacts.iter().find(|a| a.schema_version > SCHEMA_VERSION) {
        bail!(
            "unsupported schema version {} (max supported: {})",
            bad.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use polywatch_core::synthesize_with_metrics_as_of;
    use std::sync::Arc;

    fn sample_report() -> TraderReport {
        let wallet = WalletRecord::new("0xabc", 20_000.0, 50.0).with_volume(1_000.0);
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let s = synthesize_with_metrics_as_of(&wallet.identity(), 20_000.0, 50.0, 30, end);
        TraderReport::new(wallet, Arc::new(s))
    }

    #[test]
    fn json_roundtrip() {
        let report = sample_report();
        let json = export_json(&report).unwrap();
        let restored = import_json(&json).unwrap();
        assert_eq!(restored.schema_version, SCHEMA_VERSION);
        assert_eq!(restored.wallet, report.wallet);
        assert_eq!(restored.synthesis.series().len(), report.synthesis.series().len());
        assert_eq!(restored.synthesis.series().dates(), report.synthesis.series().dates());
        assert!((restored.synthesis.metrics.sharpe - report.synthesis.metrics.sharpe).abs() < 1e-10);
    }

    #[test]
    fn json_rejects_unknown_version() {
        let mut artifact = ReportArtifact::from(&sample_report());
        artifact.schema_version = 99;
        let json = serde_json::to_string(&artifact).unwrap();
        let msg = import_json(&json).unwrap_err().to_string();
        assert!(msg.contains("unsupported schema version 99"));
    }

    #[test]
    fn series_csv_layout() {
        let report = sample_report();
        let csv = export_series_csv(report.synthesis.series()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "date,equity,daily_pnl");
        assert_eq!(lines.len(), 31);
        assert!(lines[1].ends_with(",0.00"));
        assert!(lines[30].starts_with("2024-12-31,20000.00,"));
    }

    #[test]
    fn batch_csv_has_header_and_rows() {
        let reports = vec![sample_report(), sample_report()];
        let csv = export_batch_csv(&reports).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("link_id,display_name,balance,roi"));
        assert!(lines[0].contains("max_drawdown_pct"));
        assert!(lines[1].starts_with("0xabc,0xabc,20000"));
    }

    #[test]
    fn save_and_load_batch() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("run");
        let reports = vec![sample_report()];
        let written = save_batch(&reports, &out).unwrap();
        assert!(written.join("metrics.csv").exists());
        let loaded = load_batch(&written).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].wallet.link_id, "0xabc");
        assert_eq!(loaded[0].profile_url, "https://polymarket.com/profile/0xabc");
    }
}
