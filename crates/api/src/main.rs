use std::sync::Arc;

use anyhow::Context;

use coursebook_api::app::{build_app, AppState};
use coursebook_api::config::AppConfig;
use coursebook_infra::{InMemoryStore, PostgresStore, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    coursebook_observability::init();

    let config = AppConfig::from_env()?;
    let store = connect_store(&config).await?;
    let app = build_app(AppState::new(store, config.log_internal_errors));

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn connect_store(config: &AppConfig) -> anyhow::Result<Arc<dyn Store>> {
    let Some(url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; using in-memory store");
        return Ok(Arc::new(InMemoryStore::new()));
    };

    let store = PostgresStore::connect(url).await.context("connecting to database")?;
    store.check_connection().await.context("database connectivity check")?;
    store.ensure_schema().await.context("creating database schema")?;
    tracing::info!(backend = "postgres", "connection to the database successful");

    Ok(Arc::new(store))
}
