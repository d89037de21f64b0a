//! Run command implementation

use crate::cli::output::{format_report_json, format_summary_table};
use crate::cli::RunArgs;
use crate::client::{RemoteListClient, RestListClient};
use crate::config::SyncConfig;
use crate::engine::{ReconciliationEngine, RunReport};
use crate::source::CsvSource;
use anyhow::{anyhow, bail, Context, Result};
use std::sync::Arc;

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(args: &RunArgs) -> Result<SyncConfig> {
    let mut config = if args.config.exists() {
        SyncConfig::load(Some(&args.config))
            .with_context(|| format!("Failed to load {}", args.config.display()))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        SyncConfig::default()
    };

    // Apply environment variable overrides
    config = config.with_env_overrides();

    // Apply CLI overrides (highest priority)
    if let Some(ref site_url) = args.site_url {
        config.remote.site_url = site_url.clone();
    }
    if let Some(ref list_name) = args.list_name {
        config.remote.list_name = list_name.clone();
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    Ok(config)
}

/// Handle `listsync run`: reconcile one CSV export against the remote list.
pub async fn run_sync(args: RunArgs) -> Result<()> {
    let config = load_config_with_overrides(&args)?;
    crate::logging::init_tracing(&config.logging)
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    config
        .validate()
        .context("Configuration is invalid; aborting before any row is processed")?;

    let http = Arc::new(reqwest::Client::new());
    let client: Arc<dyn RemoteListClient> =
        Arc::new(RestListClient::new(http, args.token.clone()));

    let report = run_with_client(Arc::clone(&client), &config, &args).await?;

    if args.json {
        println!("{}", format_report_json(&report));
    } else {
        println!("{}", format_summary_table(&report.summary()));
    }

    let summary = report.summary();
    if summary.failed > 0 {
        bail!(
            "{} of {} rows failed; see the run log for details",
            summary.failed,
            summary.total()
        );
    }
    Ok(())
}

/// Connect, process every row, and release the session.
///
/// The session is acquired once and released exactly once; the disconnect
/// runs even when connection or row processing errored.
pub async fn run_with_client(
    client: Arc<dyn RemoteListClient>,
    config: &SyncConfig,
    args: &RunArgs,
) -> Result<RunReport> {
    let result = run_batch(Arc::clone(&client), config, args).await;

    if let Err(e) = client.disconnect().await {
        tracing::warn!(error = %e, "Failed to release remote session");
    }

    result
}

async fn run_batch(
    client: Arc<dyn RemoteListClient>,
    config: &SyncConfig,
    args: &RunArgs,
) -> Result<RunReport> {
    let site_url = config.remote.site_url.trim_end_matches('/');

    // Reuse an existing session already pointed at the configured site.
    let session = client.current_session().await;
    if session.as_deref().map(|s| s.trim_end_matches('/')) == Some(site_url) {
        tracing::debug!(site_url = %site_url, "Reusing existing session");
    } else {
        client
            .connect(site_url)
            .await
            .with_context(|| format!("Failed to connect to {}", site_url))?;
    }

    let rows = CsvSource::from_path(&args.csv)
        .with_context(|| format!("Failed to open {}", args.csv.display()))?
        .rows()
        .context("Failed to read CSV header")?;
    tracing::info!(
        csv = %args.csv.display(),
        rows = rows.len(),
        list = %config.remote.list_name,
        "Starting reconciliation run"
    );

    let engine = ReconciliationEngine::new(client, config)
        .context("Field mapping configuration is invalid")?;

    Ok(engine.run(rows).await)
}
