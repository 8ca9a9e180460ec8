pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use cardoon_core::{StaticCatalog, StreakScheduler};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub catalog: Arc<StaticCatalog>,
    pub scheduler: Arc<StreakScheduler>,
    pub config: Arc<Config>,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // User routes
        .route("/api/users/me", get(routes::users::me))
        // Card routes
        .route("/api/cards", post(routes::cards::create))
        .route("/api/cards/due", get(routes::cards::due))
        .route("/api/cards/:card_id/answer", post(routes::cards::answer))
        // Hero routes
        .route("/api/hero/bonus", post(routes::hero::add_bonus))
        // Adventure routes
        .route(
            "/api/adventure/levels/:level_id/enemies",
            get(routes::adventure::enemies),
        )
        // Shop routes
        .route("/api/shop", get(routes::shop::list))
        .route("/api/shop/:item_id/buy", post(routes::shop::buy))
        .route("/api/shop/:item_id/equip", post(routes::shop::equip))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/users/register", post(routes::users::register))
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Load the enemy catalog from a file, or the built-in one
pub fn load_catalog(config: &Config) -> anyhow::Result<StaticCatalog> {
    match &config.enemy_catalog_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading enemy catalog {}", path.display()))?;
            StaticCatalog::from_json(&json)
                .with_context(|| format!("parsing enemy catalog {}", path.display()))
        }
        None => StaticCatalog::builtin().context("loading built-in enemy catalog"),
    }
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let catalog = load_catalog(&config)?;
    tracing::info!("Loaded enemy catalog with {} levels", catalog.levels.len());

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let addr = config.bind_addr();
    let state = AppState {
        db: Arc::new(db),
        catalog: Arc::new(catalog),
        scheduler: Arc::new(StreakScheduler::default()),
        config: Arc::new(config),
    };

    let app = router(state);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
