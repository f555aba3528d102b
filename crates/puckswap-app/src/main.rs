// Trade recommender entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Load the roster snapshot
// 4. Run the analysis pipeline
// 5. Write the report

use puckswap::config;
use puckswap::provider;
use puckswap::report::{write_report, TradeReport};
use puckswap_core::pipeline::analyze;

use anyhow::Context;
use std::path::Path;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("puckswap starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    let categories = config.category_set();
    info!(
        "Config loaded: league={}, my_team={}, {} categories",
        config.league.name,
        config.league.my_team,
        categories.len()
    );

    // 3. Load the roster snapshot
    let source = provider::from_config(&config);
    info!("Loading {}", source.describe());
    let snapshot = source
        .load()
        .await
        .with_context(|| format!("failed to load {}", source.describe()))?;
    info!(
        "Loaded {} stat lines across {} teams",
        snapshot.lines.len(),
        snapshot.team_names.len()
    );

    // 4. Run the analysis pipeline
    let analysis = analyze(
        &snapshot.lines,
        &categories,
        &config.league.my_team,
        &config.analysis(),
    )
    .context("trade analysis failed")?;

    // 5. Write the report
    let report = TradeReport::build(&analysis, &snapshot, &config, chrono::Utc::now());
    write_report(Path::new(&config.output.report), &report)
        .await
        .context("failed to write trade report")?;

    if report.recommendations.is_empty() {
        warn!("no trade recommendations for {}", report.my_team_name);
    }
    for entry in &report.recommendations {
        info!(
            "#{} {} with {}: boost {:.1}, net gain {:.2}, improves {:?}",
            entry.rank,
            entry.shape,
            entry.partner_name,
            entry.trade.boost_score,
            entry.trade.net_gain,
            entry.trade.improves
        );
    }

    println!(
        "{} trade recommendations for {} written to {}",
        report.recommendations.len(),
        report.my_team_name,
        config.output.report
    );

    Ok(())
}

const LOG_FILE: &str = "logs/puckswap.log";
const DEFAULT_LOG_FILTER: &str = "puckswap=info,puckswap_app=info,puckswap_core=info,warn";

/// Send tracing output to `LOG_FILE`, appending so earlier runs are kept.
/// `RUST_LOG` overrides the default filter.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_path = std::env::current_dir()?.join(LOG_FILE);
    if let Some(dir) = log_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to set tracing subscriber: {e}"))
}
