//! `rigscout` command line entry point.
//!
//! Scans the listing URLs given as arguments with the user's configuration
//! and prints the job summary as JSON. Ctrl-C cancels the scan; units
//! already in flight finish and are kept.

use anyhow::{bail, Context, Result};
use rigscout_core::{telemetry, AppConfig, ScanOptions};
use rigscout_scanner::{ProgressCallback, ScanOrchestrator};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let urls: Vec<String> = std::env::args().skip(1).collect();
    if urls.is_empty() {
        bail!("usage: rigscout <listing-url>...");
    }

    let mut config = AppConfig::load_with_env().context("failed to load configuration")?;
    if config.storage.database_path.is_none() {
        config.storage.database_path = Some(AppConfig::data_dir()?.join("rigscout.db"));
    }

    let orchestrator = Arc::new(
        ScanOrchestrator::from_config(&config)
            .await
            .context("failed to set up scanner")?,
    );
    let job = orchestrator
        .create_job(&urls, ScanOptions::from(&config.scanning))
        .await?;

    let cancel = {
        let orchestrator = Arc::clone(&orchestrator);
        let job_id = job.id.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!(job_id = %job_id, "interrupt received, cancelling scan");
                if let Err(e) = orchestrator.cancel_job(&job_id).await {
                    warn!(job_id = %job_id, error = %e, "cancel failed");
                }
            }
        })
    };

    let progress: ProgressCallback = Arc::new(|update| {
        info!(
            current = update.current,
            total = update.total,
            url = %update.current_url,
            "{}",
            update.status_text
        );
    });
    let finished = orchestrator.start_job(&job.id, Some(progress)).await?;
    cancel.abort();

    let summary = orchestrator.summary(&finished.id).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
