use std::time::Duration;

use configs::DatabaseConfig;
use mongodb::{options::ClientOptions, Client, Database};
use tracing::info;

/// Build the single client used for the process lifetime and select the
/// configured database. The driver connects lazily; use a ping to verify.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<Database> {
    let mut options = ClientOptions::parse(&cfg.url).await?;
    options.app_name = Some("enterprise-directory".to_string());
    options.connect_timeout = Some(Duration::from_secs(cfg.connect_timeout_secs));
    options.server_selection_timeout = Some(Duration::from_secs(cfg.connect_timeout_secs));
    let client = Client::with_options(options)?;
    info!(database = %cfg.name, "mongodb client created");
    Ok(client.database(&cfg.name))
}
