//! Per-wallet profile report: headline figures plus a plain-text card.

use std::fmt;
use std::sync::Arc;

use polywatch_core::Synthesis;
use serde::{Deserialize, Serialize};

use crate::source::WalletRecord;

/// Drawdown (percent) below which a tracked wallet is flagged high risk.
pub const HIGH_RISK_DRAWDOWN_PCT: f64 = -15.0;
/// Drawdown (percent) below which a scanned address is graded degen.
pub const DEGEN_DRAWDOWN_PCT: f64 = -30.0;

pub const PROFILE_URL_BASE: &str = "https://polymarket.com/profile/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    High,
}

impl RiskLevel {
    pub fn from_drawdown(max_drawdown_pct: f64) -> Self {
        if max_drawdown_pct < HIGH_RISK_DRAWDOWN_PCT {
            RiskLevel::High
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLevel::Low => "Low",
            RiskLevel::High => "High",
        })
    }
}

/// Coarse grade for ad-hoc address scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskGrade {
    Pro,
    Degen,
}

impl RiskGrade {
    pub fn from_drawdown(max_drawdown_pct: f64) -> Self {
        if max_drawdown_pct < DEGEN_DRAWDOWN_PCT {
            RiskGrade::Degen
        } else {
            RiskGrade::Pro
        }
    }
}

impl fmt::Display for RiskGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskGrade::Pro => "PRO",
            RiskGrade::Degen => "DEGEN",
        })
    }
}

pub fn profile_url(link_id: &str) -> String {
    format!("{PROFILE_URL_BASE}{link_id}")
}

/// Everything shown on a wallet's profile page.
#[derive(Debug, Clone, PartialEq)]
pub struct TraderReport {
    pub wallet: WalletRecord,
    pub synthesis: Arc<Synthesis>,
}

impl TraderReport {
    pub fn new(wallet: WalletRecord, synthesis: Arc<Synthesis>) -> Self {
        Self { wallet, synthesis }
    }

    /// Balance gained since the start of the synthesized window.
    pub fn all_time_pnl(&self) -> f64 {
        self.wallet.balance - self.synthesis.metrics.start_balance
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_drawdown(self.synthesis.metrics.max_drawdown_pct)
    }

    pub fn profile_url(&self) -> String {
        profile_url(&self.wallet.link_id)
    }

    /// Multi-line text card for terminals and logs.
    pub fn render_card(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TraderReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.synthesis.metrics;
        writeln!(f, "{}", self.wallet.short_name())?;
        writeln!(f, "  {}", self.profile_url())?;
        writeln!(f, "  All-Time PnL     {}", format_usd(self.all_time_pnl()))?;
        writeln!(f, "  Current Balance  {}", format_usd(self.wallet.balance))?;
        writeln!(f, "  Win Rate         {:.1}%", m.win_rate_pct)?;
        writeln!(f, "  Sharpe Ratio     {:.2}", m.sharpe)?;
        writeln!(f, "  Avg Win          {}", format_usd(m.avg_win))?;
        writeln!(f, "  Avg Loss         {}", format_usd(m.avg_loss))?;
        writeln!(f, "  Expectancy       {}", format_usd(m.expectancy))?;
        writeln!(f, "  Profit Factor    {:.2}", m.profit_factor)?;
        writeln!(f, "  Max Drawdown     {:.1}%", m.max_drawdown_pct)?;
        write!(f, "  Risk Level       {}", self.risk_level())
    }
}

/// Whole dollars with thousands separators, e.g. `-$12,345`.
pub fn format_usd(value: f64) -> String {
    if !value.is_finite() {
        return format!("${value}");
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}
