//! PolyWatch CLI — synthesized wallet histories, leaderboard, and exports.
//!
//! Commands:
//! - `history`: synthesize one wallet's history from balance and ROI
//! - `leaderboard`: filter, rank, and page through the wallet dataset
//! - `trader`: profile card for a wallet in the dataset
//! - `analyze`: reproducible quick look at any address
//! - `batch`: evaluate every wallet and write metrics and reports to disk

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use polywatch_core::{synthesize_with_metrics_as_of, Identity, PerformanceMetrics};
use polywatch_runner::source::find_wallet;
use polywatch_runner::{
    analyze_address, export_series_csv, load_required, save_batch, BatchEvaluator,
    CsvSource, DashboardConfig, DatasetOptions, Leaderboard, SortKey, SynthesisCache,
    TraderReport, ViewState, WalletRecord,
};

#[derive(Parser)]
#[command(
    name = "polywatch",
    version,
    about = "PolyWatch CLI: synthetic performance histories for prediction-market wallets"
)]
struct Cli {
    /// Path to a TOML config file. Built-in defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG overrides).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// How `history` prints its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Headline figures and metrics.
    Text,
    /// The full synthesis as pretty JSON.
    Json,
    /// The daily series as `date,equity,daily_pnl`.
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize a history from a wallet's balance and cumulative ROI.
    History {
        /// Wallet address or any stable identifier.
        #[arg(long)]
        id: String,

        /// Current balance in dollars.
        #[arg(long, allow_negative_numbers = true)]
        balance: f64,

        /// Cumulative ROI in percent.
        #[arg(long, allow_negative_numbers = true)]
        roi: f64,

        /// Days of history. Defaults to engine.horizon_days.
        #[arg(long)]
        horizon: Option<usize>,

        /// Final date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        as_of: Option<String>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show one page of the wallet leaderboard.
    Leaderboard {
        /// Wallet dataset (CSV). Defaults to data.path.
        #[arg(long)]
        data: Option<PathBuf>,

        /// Sort column: roi, balance, or volume.
        #[arg(long)]
        sort: Option<String>,

        /// Page number, starting at 1.
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Minimum ROI in percent.
        #[arg(long, allow_negative_numbers = true)]
        min_roi: Option<f64>,

        /// Minimum balance in dollars.
        #[arg(long)]
        min_balance: Option<f64>,
    },
    /// Profile card for a wallet in the dataset.
    Trader {
        /// Wallet link id as it appears in the dataset.
        #[arg(long)]
        id: String,

        /// Wallet dataset (CSV). Defaults to data.path.
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Reproducible quick look at an arbitrary address.
    Analyze {
        /// Wallet address (0x...).
        address: String,
    },
    /// Evaluate every wallet in the dataset and write artifacts.
    Batch {
        /// Wallet dataset (CSV). Defaults to data.path.
        #[arg(long)]
        data: Option<PathBuf>,

        /// Output directory for metrics.csv and reports.json.
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::History {
            id,
            balance,
            roi,
            horizon,
            as_of,
            format,
        } => run_history(&config, &id, balance, roi, horizon, as_of.as_deref(), format),
        Commands::Leaderboard {
            data,
            sort,
            page,
            min_roi,
            min_balance,
        } => run_leaderboard(&config, data, sort.as_deref(), page, min_roi, min_balance),
        Commands::Trader { id, data } => run_trader(&config, &id, data),
        Commands::Analyze { address } => run_analyze(&config, &address),
        Commands::Batch { data, out } => run_batch(&config, data, &out),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    match path {
        Some(p) => {
            tracing::info!(path = %p.display(), "loading config");
            DashboardConfig::from_file(p)
                .with_context(|| format!("failed to load config {}", p.display()))
        }
        None => Ok(DashboardConfig::default()),
    }
}

fn parse_date(s: Option<&str>) -> Result<NaiveDate> {
    match s {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn load_dataset(config: &DashboardConfig, data: Option<PathBuf>) -> Result<Vec<WalletRecord>> {
    let path = data.unwrap_or_else(|| config.data.path.clone());
    let source = CsvSource::new(&path, DatasetOptions::from(&config.data));
    load_required(&source).with_context(|| format!("failed to load wallets from {}", path.display()))
}

fn print_metrics(m: &PerformanceMetrics) {
    println!("  Start Balance    {:.2}", m.start_balance);
    println!("  Sharpe Ratio     {:.2}", m.sharpe);
    println!("  Win Rate         {:.1}%", m.win_rate_pct);
    println!("  Profit Factor    {:.2}", m.profit_factor);
    println!("  Max Drawdown     {:.1}%", m.max_drawdown_pct);
    println!("  Avg Win          {:.2}", m.avg_win);
    println!("  Avg Loss         {:.2}", m.avg_loss);
    println!("  Expectancy       {:.2}", m.expectancy);
}

fn run_history(
    config: &DashboardConfig,
    id: &str,
    balance: f64,
    roi: f64,
    horizon: Option<usize>,
    as_of: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let end_date = parse_date(as_of)?;
    let horizon = horizon.unwrap_or(config.engine.horizon_days);
    let identity = Identity::from(id);
    let synthesis = synthesize_with_metrics_as_of(&identity, balance, roi, horizon, end_date);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&synthesis)?),
        OutputFormat::Csv => print!("{}", export_series_csv(synthesis.series())?),
        OutputFormat::Text => {
            let series = synthesis.series();
            println!("{}", identity.display_name());
            match (series.first_date(), series.last_date()) {
                (Some(first), Some(last)) => {
                    println!("  {} days, {first} to {last}", series.len())
                }
                _ => println!("  empty history"),
            }
            if let Some(eq) = series.last_equity() {
                println!("  Final Equity     {eq:.2}");
            }
            print_metrics(&synthesis.metrics);
        }
    }
    Ok(())
}

fn run_leaderboard(
    config: &DashboardConfig,
    data: Option<PathBuf>,
    sort: Option<&str>,
    page: usize,
    min_roi: Option<f64>,
    min_balance: Option<f64>,
) -> Result<()> {
    let board = Leaderboard::new(load_dataset(config, data)?);

    let mut view = ViewState::from(&config.leaderboard);
    if let Some(s) = sort {
        view.set_sort(s.parse::<SortKey>()?);
    }
    view.page = page.saturating_sub(1);
    if let Some(r) = min_roi {
        view.min_roi = r;
    }
    if let Some(b) = min_balance {
        view.min_balance = b;
    }

    let headline = board.headline();
    println!(
        "Top ROI {:.0}%   Total Volume {}   Wallets Tracked {}",
        headline.top_roi,
        polywatch_runner::report::format_usd(headline.total_volume),
        headline.wallets_tracked
    );
    println!();

    let shown = board.page(&view);
    println!(
        "{:>4}  {:<20} {:>10} {:>14} {:>16}",
        "#", "TRADER", "ROI", "BALANCE", "VOLUME"
    );
    for row in &shown.rows {
        let w = &row.wallet;
        println!(
            "{:>4}  {:<20} {:>9.1}% {:>14} {:>16}",
            row.rank,
            w.short_name(),
            w.roi,
            polywatch_runner::report::format_usd(w.balance),
            polywatch_runner::report::format_usd(w.volume),
        );
    }
    println!();
    println!(
        "Page {} of {} ({} matching, sorted by {})",
        shown.page + 1,
        shown.total_pages,
        shown.matching,
        view.sort_by
    );
    Ok(())
}

fn run_trader(config: &DashboardConfig, id: &str, data: Option<PathBuf>) -> Result<()> {
    let wallets = load_dataset(config, data)?;
    let Some(wallet) = find_wallet(&wallets, id) else {
        bail!("wallet '{id}' not found in dataset");
    };
    let cache = SynthesisCache::from_config(&config.cache);
    let synthesis = cache.get_or_compute(
        &wallet.identity(),
        wallet.balance,
        wallet.roi,
        config.engine.horizon_days,
    );
    let report = TraderReport::new(wallet.clone(), synthesis);
    println!("{}", report.render_card());
    Ok(())
}

fn run_analyze(config: &DashboardConfig, address: &str) -> Result<()> {
    if address.trim().is_empty() {
        bail!("address must not be empty");
    }
    let analysis = analyze_address(address, config.engine.horizon_days);
    println!("{}", analysis.address.display_name());
    println!(
        "  Estimated Balance  {}",
        polywatch_runner::report::format_usd(analysis.estimated_balance)
    );
    println!("  Realized ROI       {:.1}%", analysis.realized_roi);
    println!("  Win Rate           {:.1}%", analysis.synthesis.metrics.win_rate_pct);
    println!("  Risk Score         {}", analysis.grade());
    Ok(())
}

fn run_batch(config: &DashboardConfig, data: Option<PathBuf>, out: &Path) -> Result<()> {
    let wallets = load_dataset(config, data)?;
    let cache = SynthesisCache::from_config(&config.cache);
    let reports =
        BatchEvaluator::today(config.engine.horizon_days).evaluate_all(&wallets, Some(&cache));
    let dir = save_batch(&reports, out)?;
    println!("Wrote {} wallet reports to {}", reports.len(), dir.display());
    Ok(())
}
