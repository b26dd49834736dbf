//! PUNTER — Martingale bankroll tracker for football draw-betting pools.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! connects the configured row store, and runs the fetch→fold→publish
//! refresh loop with graceful shutdown.

use anyhow::{Context, Result};
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use punter::config::AppConfig;
use punter::dashboard::routes::DashboardState;
use punter::dashboard::spawn_dashboard;
use punter::ingest;
use punter::ledger::Ledger;
use punter::registry::CompetitionRegistry;
use punter::report::Summary;
use punter::sheets::file::FileStore;
use punter::sheets::google::GoogleSheetsClient;
use punter::sheets::{self, RowStore};

const BANNER: &str = r#"
 ____  _   _ _   _ _____ _____ ____
|  _ \| | | | \ | |_   _| ____|  _ \
| |_) | | | |  \| | | | |  _| | |_) |
|  __/| |_| | |\  | | | | |___|  _ <
|_|    \___/|_| \_| |_| |_____|_| \_\

  Progressive Unit-doubling Next-stake Tracker & Exposure Reporter
  v0.1.0 — Bankroll Tracker
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        tracker = %cfg.tracker.name,
        refresh_interval_secs = cfg.tracker.refresh_interval_secs,
        initial_bankroll = %cfg.tracker.initial_bankroll,
        currency = %cfg.tracker.currency,
        "PUNTER starting up"
    );

    // -- Row store ---------------------------------------------------------

    let store: Box<dyn RowStore> = match cfg.sheet.provider.as_str() {
        "google" => {
            let spreadsheet_id = cfg
                .sheet
                .spreadsheet_id
                .clone()
                .context("sheet.spreadsheet_id is required for the google provider")?;
            let token_env = cfg.sheet.token_env.as_deref().unwrap_or("SHEETS_TOKEN");
            let token = SecretString::new(AppConfig::resolve_env(token_env)?);
            info!(spreadsheet_id = %spreadsheet_id, "Using Google Sheets row store");
            Box::new(GoogleSheetsClient::new(
                spreadsheet_id,
                token,
                cfg.sheet.bets_range.clone(),
                cfg.sheet.competitions_range.clone(),
            )?)
        }
        "file" => {
            let path = cfg.sheet.snapshot_path.as_deref().unwrap_or("punter_sheet.json");
            info!(path, "Using local file row store");
            Box::new(FileStore::open(path)?)
        }
        other => {
            warn!(provider = other, "Unknown sheet provider, falling back to file store");
            let path = cfg.sheet.snapshot_path.as_deref().unwrap_or("punter_sheet.json");
            Box::new(FileStore::open(path)?)
        }
    };

    // -- Dashboard ---------------------------------------------------------

    let dash_state = Arc::new(DashboardState::new(Summary::empty(
        cfg.tracker.initial_bankroll,
        &cfg.tracker.currency,
    )));

    if cfg.dashboard.enabled {
        spawn_dashboard(dash_state.clone(), cfg.dashboard.port)?;
    }

    // -- Refresh loop ------------------------------------------------------

    let refresh_interval = Duration::from_secs(cfg.tracker.refresh_interval_secs);
    let mut interval = tokio::time::interval(refresh_interval);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        interval_secs = cfg.tracker.refresh_interval_secs,
        "Entering refresh loop. Press Ctrl+C to stop."
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match run_refresh(&*store, &cfg, &dash_state).await {
                    Ok(summary) => {
                        info!(
                            balance = %summary.current_balance,
                            profit = %summary.totals.net_profit,
                            at_risk = %summary.totals.pending_losses,
                            resolved = summary.totals.resolved_rows,
                            pending = summary.totals.pending_rows,
                            dropped = summary.totals.dropped_rows,
                            "Refresh complete"
                        );
                    }
                    Err(e) => {
                        error!(error = %e, "Refresh failed — keeping previous state");
                    }
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    info!("PUNTER shut down cleanly.");
    Ok(())
}

/// Run a single fetch→parse→fold→publish refresh.
async fn run_refresh(
    store: &dyn RowStore,
    cfg: &AppConfig,
    dash_state: &DashboardState,
) -> Result<Summary> {
    // 1. One atomic snapshot of both ranges
    let snapshot = sheets::load_snapshot(store).await?;

    // 2. Parse
    let registry = CompetitionRegistry::from_rows(&snapshot.competitions);
    let records = ingest::parse_bets(&snapshot.bets);
    info!(
        bets = records.len(),
        competitions = registry.len(),
        store = store.name(),
        "Snapshot fetched"
    );

    // 3. Fold the full history
    let output = Ledger::process(&records, &registry);

    // 4. Aggregate and publish
    let summary = Summary::build(
        &output,
        &registry,
        cfg.tracker.initial_bankroll,
        &cfg.tracker.currency,
    );
    dash_state.publish(summary.clone(), output.rows).await;

    Ok(summary)
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("punter=info"));

    let json_logging = std::env::var("PUNTER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
