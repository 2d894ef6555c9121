//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, worker spawning, and the Axum
//! server lifecycle including graceful shutdown.

use crate::application::click_worker::{ClickQueue, run_click_worker};
use crate::application::services::{AnalyticsService, EngineOptions, LinkService, StatsService};
use crate::config::{CacheBackend, Config};
use crate::infrastructure::cache::{LinkCache, MemoryCache, NullCache, RedisCache};
use crate::infrastructure::persistence::{PgClickStore, PgLinkStore};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations
/// - Link cache (falls back to no cache if Redis is unreachable)
/// - Cache warm-up in the background
/// - Background click worker
/// - Axum HTTP server
///
/// On Ctrl+C the server stops accepting requests, then the click queue is
/// drained before returning.
///
/// # Errors
///
/// Returns an error if the database is unreachable, migrations fail, or the
/// listener cannot bind.
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let cache = build_cache(&config).await;

    let pool = Arc::new(pool);
    let link_store = Arc::new(PgLinkStore::new(pool.clone()));
    let click_store = Arc::new(PgClickStore::new(pool.clone()));

    let options = EngineOptions {
        cache_ttl: config.cache_ttl(),
        store_timeout: config.store_timeout(),
        code_length: config.code_length,
    };

    let link_service = Arc::new(LinkService::new(link_store.clone(), cache.clone(), options));
    let stats_service = Arc::new(StatsService::new(link_store.clone(), click_store.clone()));
    let analytics = Arc::new(AnalyticsService::new(click_store, link_store, cache));

    if config.cache_warm_links > 0 {
        let service = link_service.clone();
        let limit = config.cache_warm_links;
        tokio::spawn(async move {
            if let Err(e) = service.warm_cache(limit).await {
                tracing::warn!(error = %e, "Cache warm-up failed");
            }
        });
    }

    let (click_queue, click_rx) = ClickQueue::new(config.click_queue_capacity);
    let worker = tokio::spawn(run_click_worker(
        click_rx,
        analytics,
        config.click_worker_concurrency,
        config.click_task_timeout(),
    ));

    let state = AppState::new(link_service, stats_service, click_queue, &config.base_url);
    let app = app_router(state, config.request_timeout());

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router (and every queue sender in it) is gone; the worker exits
    // once the remaining events are recorded.
    tracing::info!("Draining click queue");
    if let Err(e) = worker.await {
        tracing::error!(error = %e, "Click worker failed");
    }

    pool.close().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Picks the cache backend. An unreachable Redis degrades to no cache.
async fn build_cache(config: &Config) -> Arc<dyn LinkCache> {
    match (config.cache_backend, &config.redis_url) {
        (CacheBackend::Redis, Some(redis_url)) => match RedisCache::connect(redis_url).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Caching disabled.", e);
                Arc::new(NullCache::new())
            }
        },
        (CacheBackend::Memory, _) => {
            tracing::info!("Cache enabled (in-process)");
            Arc::new(MemoryCache::new(config.cache_memory_capacity))
        }
        _ => {
            tracing::info!("Cache disabled");
            Arc::new(NullCache::new())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
