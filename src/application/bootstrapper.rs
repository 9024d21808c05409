//! Application bootstrapper
//!
//! Loads configuration, sets up logging and the database, then serves the API.

use axum::Router;
use http::{header, HeaderValue, Method};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LogFormat};
use crate::db;
use crate::endpoints;
use crate::services::{seed, today};
use crate::state::AppState;

/// Bootstrap and run the application
pub async fn run() -> anyhow::Result<()> {
    // A missing .env file is fine; the process environment still applies
    let _ = dotenvy::dotenv();

    let config = Config::from_env();
    init_tracing(&config);

    tracing::info!("Starting Scholarhub v{}", config.version);

    let state = init_state(config).await?;
    let app = create_app(state.clone());

    serve(app, &state.config).await
}

/// Initialize tracing/logging
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("scholarhub={},tower_http=info", config.log_level).into());

    let (text, json) = match config.log_format {
        LogFormat::Text => (Some(tracing_subscriber::fmt::layer().with_ansi(false)), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .init();
}

/// Connect to the database, prepare the upload root and seed if asked to
async fn init_state(config: Config) -> anyhow::Result<AppState> {
    let conn = db::connect_with_url(&config.database.database_url).await?;
    tracing::info!("Database connection established");

    tokio::fs::create_dir_all(&config.uploads.upload_dir).await?;
    tracing::info!("Upload root: {}", config.uploads.upload_dir.display());

    let state = AppState::new(conn, config);

    if state.config.seed_demo_data {
        let report = seed::seed_demo_data(&state.db, &state.credentials, today()).await?;
        tracing::info!(?report, "Demo data seeding finished");
    }

    Ok(state)
}

/// CORS for the configured origins; any origin when none are configured
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    // Session cookies need credentialed CORS, which rules out wildcards
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Create the main application router
fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.allowed_origins);

    endpoints::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the HTTP server
async fn serve(app: Router, config: &Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
