use std::sync::Arc;

use anyhow::Context;
use course_helper::catalog::CatalogService;
use course_helper::config::Config;
use course_helper::db::CatalogDbManager;
use course_helper::server;
use course_helper::types::AppState;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load()?;

    info!("Opening catalog at {}", config.db_path);
    let db = CatalogDbManager::open(&config.db_path)
        .with_context(|| format!("Failed to open catalog {}", config.db_path))?;

    if let Some(seed) = &config.seed_path {
        if db.is_empty()? {
            info!("Catalog is empty, importing {}", seed.display());
            db.import_json(seed)
                .with_context(|| format!("Failed to import {}", seed.display()))?;
        } else {
            info!("Catalog already has data, skipping import");
        }
    }

    let state = Arc::new(AppState::new(CatalogService::new(
        Arc::new(db),
        config.retry,
    )));

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    server::serve(listener, state).await?;
    Ok(())
}
