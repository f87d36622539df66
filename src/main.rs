// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Running-Sync CLI
//!
//! Parses the Mi history export, fetches Strava activities, merges both
//! into the combined ledger, writes the export artifacts, and logs the
//! derived statistics. Either source failing only costs that source's
//! records; the run itself always completes.

use clap::Parser;
use running_sync::{
    adapters::{MiAdapter, ParseOutcome, StravaAdapter, StravaClient},
    config::Config,
    export::Exporter,
    ledger::Ledger,
    stats,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Sync Mi and Strava running records into one ledger")]
struct Cli {
    /// Data directory for inputs and export artifacts (overrides DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Mi history export path (defaults to <data-dir>/mi_running_history.txt)
    #[arg(long)]
    mi_file: Option<PathBuf>,

    /// Skip the Strava fetch even when credentials are configured
    #[arg(long)]
    skip_strava: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let mi_path = cli.mi_file.unwrap_or_else(|| config.mi_history_path());
    tracing::info!(data_dir = %config.data_dir.display(), "Starting running-sync");

    // 1. Parse the Mi export
    let mi = MiAdapter::parse_file(&mi_path);
    mi.log_warnings("mi");

    // 2. Fetch Strava activities; failure degrades to zero records
    let strava = match (&config.strava, cli.skip_strava) {
        (Some(credentials), false) => {
            let client = StravaClient::new(credentials.clone());
            StravaAdapter::new(client).fetch(&config.fetch_after).await
        }
        _ => {
            tracing::info!("Strava source disabled");
            ParseOutcome::default()
        }
    };
    strava.log_warnings("strava");

    // 3. Per-source exports, then merge and export the combined ledger
    let exporter = Exporter::new(&config.data_dir);
    exporter.write_source_json("running_records_manual_add.json", &mi.records, "manual_add")?;
    exporter.write_source_json("running_records_strava_sync.json", &strava.records, "strava_sync")?;

    let ledger = Ledger::merge(vec![mi.records, strava.records]);
    exporter.write_combined_json(&ledger)?;
    exporter.write_csv(&ledger)?;

    // 4. Derived statistics for the renderer
    let today = chrono::Local::now().date_naive();
    let summary = stats::summary(&ledger, today);
    let rolling = stats::rolling_12_month_totals(&ledger, today);
    let attendance = stats::monthly_attendance(&ledger, today);
    let paces = stats::pace_seconds(&ledger);

    tracing::info!(
        total_runs = summary.total_runs,
        total_km = summary.total_km,
        this_year_km = summary.current_year_km,
        years = summary.years_spanned,
        paces = paces.len(),
        "Ledger statistics"
    );
    if let Some((date, km)) = summary.latest {
        tracing::info!(date = %date, km, "Latest run");
    }
    for (month, km) in &rolling {
        tracing::debug!(month = %month, km = *km, "Rolling total");
    }
    tracing::debug!(
        all_time = ?attendance.all_time,
        current_year = ?attendance.current_year,
        "Monthly attendance"
    );

    Ok(())
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
