use std::net::SocketAddr;

use anyhow::Context;
use diary_api::config::Config;
use diary_api::db::{self, MemoryStore, Store};
use diary_api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "diary_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Config::from_env()?;

    let store = match &config.database_url {
        Some(url) => {
            let pool = db::pool::create_pool(url).await?;
            db::pool::run_migrations(&pool).await?;
            Store::Postgres(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store; data is lost on exit");
            Store::Memory(MemoryStore::new())
        }
    };

    let addr = config.listen_addr();
    let state = AppState::new(store, config);
    state.rate_limiter.spawn_cleanup_worker();

    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Starting server on {}", addr);

    // Connect info feeds the per-IP auth rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
