/*
 * Responsibility
 * - Config load -> storage backend -> Router assembly
 * - middleware application (CORS, request-id, trace)
 * - axum::serve() startup
 */
use anyhow::Result;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use crate::{
    api,
    config::{Config, StorageConfig},
    middleware,
    state::AppState,
};

pub async fn run() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let state = match &config.storage {
        StorageConfig::Memory => {
            tracing::info!("using in-memory storage");
            AppState::in_memory()
        }
        StorageConfig::Postgres { database_url } => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("using postgres storage");
            AppState::postgres(pool)
        }
    };

    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = api::routes().with_state(state);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}
