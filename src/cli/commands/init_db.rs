use anyhow::{bail, Context};
use serde_json::json;

use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::store::{LeadStore, PgLeadStore};

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    if config.database.url.starts_with("memory:") || config.database.url.trim().is_empty() {
        bail!("DATABASE_URL must point at PostgreSQL to initialize the schema");
    }

    let store = PgLeadStore::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    store.ensure_schema().await.context("failed to create leads table")?;
    store.close().await;

    match output_format {
        OutputFormat::Json => println!("{}", json!({ "success": true, "table": "leads" })),
        OutputFormat::Text => println!("leads table is ready"),
    }
    Ok(())
}
