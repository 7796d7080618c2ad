//! tally-sync - Attendance Sync Service
//!
//! Reconciles one calendar day of time-tracking events from the external
//! provider with the internal employee directory and persists deduplicated
//! check-in/check-out records with computed working hours. Designed to be
//! invoked once per day (cron or manual); repeated runs are idempotent.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tally_sync::models::{Coordinates, SyncOutcome};
use tally_sync::services::{SyncOrchestrator, TimeclockClient};

#[derive(Parser, Debug)]
#[command(name = "tally-sync", about = "One-day attendance reconciliation pass")]
struct Args {
    /// Day to sync (YYYY-MM-DD); defaults to today in the configured zone
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Root data folder (holds tally.db)
    #[arg(long, env = "TALLY_ROOT")]
    root_folder: Option<PathBuf>,

    /// Config file path override
    #[arg(long)]
    config: Option<PathBuf>,

    /// Named local zone override (e.g. Africa/Cairo)
    #[arg(long, env = "TALLY_TIMEZONE")]
    timezone: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Starting tally-sync (Attendance Sync)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Step 1: Load configuration
    let mut config = match &args.config {
        Some(path) => tally_common::config::TomlConfig::load(path)?,
        None => tally_common::config::TomlConfig::load_default(),
    };
    if args.timezone.is_some() {
        config.timezone = args.timezone.clone();
    }
    let tz = config.local_timezone()?;
    let (latitude, longitude) = config.default_location();

    // Step 2: Resolve root folder and open the database
    let root_folder =
        tally_common::config::resolve_root_folder(args.root_folder.as_deref(), &config);
    let db_path = tally_common::config::database_path(&root_folder);
    info!("Database: {}", db_path.display());

    let db = tally_common::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    // Step 3: Resolve provider credentials (Database -> ENV -> TOML)
    let credentials = tally_sync::config::resolve_provider_credentials(&db, &config).await?;
    let client = TimeclockClient::new(&config, credentials.client_id, credentials.client_secret)?;

    // Step 4: Run one full pass for the target day
    let date = args
        .date
        .unwrap_or_else(|| Utc::now().with_timezone(&tz).date_naive());
    info!("Sync date: {} (zone {})", date, tz);

    let orchestrator = SyncOrchestrator::new(
        db,
        client,
        tz,
        Coordinates {
            latitude,
            longitude,
        },
    );
    let report = orchestrator.run(date).await;

    info!("{}", report.summary());

    match report.outcome {
        SyncOutcome::Success | SyncOutcome::ZeroEntries => Ok(()),
        SyncOutcome::AuthFailure => std::process::exit(1),
    }
}
