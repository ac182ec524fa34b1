use std::sync::Arc;

use anyhow::Context;
use api::{router, AppState};
use auth::{AuthService, SqliteCredentialStore, TokenIssuer};
use filekeep_core::{logging, AppConfig};
use storage::{FileLogRepository, FileManager, FileStore};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let (config, overrides) = AppConfig::load_with_env().context("failed to load configuration")?;
    if !overrides.is_empty() {
        info!(keys = ?overrides, "configuration overridden from environment");
    }

    let pool = filekeep_core::connect(&config.database.url)
        .await
        .with_context(|| format!("failed to open database {}", config.database.url))?;

    let store = Arc::new(SqliteCredentialStore::new(pool.clone()));
    let auth_service = AuthService::new(store, TokenIssuer::from_config(&config.auth));

    let files = FileStore::new(&config.storage.upload_dir)
        .await
        .with_context(|| format!("failed to prepare upload directory {}", config.storage.upload_dir.display()))?;
    let file_manager = FileManager::new(files, FileLogRepository::new(pool));

    let state = Arc::new(AppState::new(auth_service, file_manager));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    let addr = listener.local_addr()?;

    info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
