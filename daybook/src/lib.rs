pub mod cli;
pub mod export;
pub mod report;

use anyhow::{bail, Context, Result};
use daybook_auth::{CredentialManager, CredentialStore, FileStore, SessionStore, Settings};
use xero_api::Client;

pub async fn run(cli: cli::Cli) -> Result<()> {
    let settings = Settings::new().context("Failed to load configuration")?;
    if let Err(e) = settings.validate() {
        bail!("Configuration validation failed: {e}");
    }

    let Some(tenant_id) = settings.tenant_id.clone() else {
        bail!("tenant_id is not configured (set DAYBOOK_TENANT_ID or tenant_id in daybook.toml)");
    };

    let store: Box<dyn CredentialStore> = if cli.session {
        // Hosted variant: tokens live only in process memory for this run
        Box::new(SessionStore::new(uuid::Uuid::new_v4().to_string()))
    } else {
        Box::new(FileStore::new(settings.tokens_path.clone()))
    };

    let manager = CredentialManager::new(settings, store)?;
    let client = Client::new(tenant_id);

    let year = cli.year();
    let (start, end) = cli.date_range();
    let mut filter = report::ReportFilter::new(start, end, cli.statuses());
    if let Some(raw) = &cli.exclude_contacts {
        filter = filter.exclude_contacts(raw);
    }

    tracing::info!("Fetching documents dated {} to {} (exclusive)", start, end);
    let report = report::build_report(&client, &manager, &filter).await?;
    tracing::info!(
        "{} rows selected, {} authorised",
        report.all.len(),
        report.authorised.len()
    );

    std::fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("Failed to create {}", cli.output_dir.display()))?;
    let path = cli.output_dir.join(format!("sales_daybook_{year}.xlsx"));
    export::write_workbook(&report, year, &path)?;
    tracing::info!("Saved workbook to {}", path.display());

    Ok(())
}
