/*
 * Responsibility
 * - Config → tracing/panic hook → pool + migrations → AppState → Router
 * - Middleware order: http stack (outermost) → CORS → v1 routes
 * - axum::serve() with graceful shutdown on Ctrl-C
 */
use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::{panic, process, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::fallback::{method_not_allowed, not_found};
use crate::config::Config;
use crate::middleware;
use crate::repos::{PgUserStore, UserStore};
use crate::services::auth::{build_auth_service, build_token_issuer};
use crate::services::authz::AccessPolicy;
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG wins when set, e.g. RUST_LOG=info,user_api=debug,tower_http=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: fail fast. production: default hook, CatchPanicLayer answers 500
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to the database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    let state = build_state(&config, Arc::new(PgUserStore::new(pool)));
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

/// Process-level services, built once and shared through `AppState`.
pub fn build_state(config: &Config, users: Arc<dyn UserStore>) -> AppState {
    AppState::new(
        users,
        build_auth_service(config),
        build_token_issuer(config),
        Arc::new(AccessPolicy::from_config(config)),
        config.users_page_size,
    )
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(&state))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state);

    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
