use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Connect the configured store and prepare its collections.
///
/// An unreachable database does not stop the process: the failure is logged,
/// `/health` keeps reporting it, and preparation is retried by the first
/// write that reaches the database.
pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    let state = if cfg.database.in_memory {
        warn!(service = "server", event = "in_memory_store", "database.in_memory is set; data is not persisted");
        AppState::in_memory(&cfg.database)
    } else {
        let db = models::db::connect(&cfg.database)
            .await
            .map_err(|e| StartupError::Database(e.to_string()))?;
        AppState::from_database(&db, &cfg.database)
    };

    if let Err(e) = state.enterprises.enterprises().ping().await {
        warn!(service = "server", event = "database_unreachable", error = %e, "database ping failed at startup");
        return Ok(state);
    }
    // unique legal id index + category seed
    match state.enterprises.ensure_ready().await {
        Ok(()) => info!(service = "server", event = "collections_ready", "enterprise collections ready"),
        Err(e) => warn!(service = "server", event = "prepare_failed", error = %e, "collection preparation deferred"),
    }
    Ok(state)
}

/// Public entry: load configuration, build the app and run the HTTP server.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state, build_cors());

    let addr = cfg.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(service = "server", event = "listening", addr = %listener.local_addr()?, "enterprise directory api listening");
    axum::serve(listener, app).await?;
    Ok(())
}
