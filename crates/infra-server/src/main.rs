//! Infra HTTP API Server
//!
//! Provides REST API endpoints for managing users, projects, application
//! teams and applications, plus free-text search over the application index.

use axum::{Router, http::HeaderValue, middleware, response::Json, routing::get};
use infra_registry::{ElasticsearchIndex, Registries, SearchIndex, SqliteStorage};
use serde_json::{Value, json};
use std::{net::SocketAddr, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

mod auth;
mod config;
mod error;
mod models;
mod routes;

use config::ServerConfig;
use error::{ApiError, Result};

/// Main application state
#[derive(Clone)]
pub struct AppState {
    pub registries: Registries,
    pub search: Arc<dyn SearchIndex>,
    pub config: ServerConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            "infra_server=debug,infra_registry=debug,tower_http=debug".to_string()
        }))
        .init();

    // Load configuration
    let config = ServerConfig::from_env()?;
    info!("Starting Infra Server on {}:{}", config.host, config.port);

    let storage = SqliteStorage::new(&config.database_url, config.database_max_connections).await?;
    let search = ElasticsearchIndex::new(&config.elasticsearch_url, &config.search_index)?;
    info!(
        "Using database {} and search index {}/{}",
        config.database_url, config.elasticsearch_url, config.search_index
    );

    if !config.auth_enabled() {
        warn!("API_TOKENS is empty, /api routes are not authenticated");
    }

    let state = AppState {
        registries: Registries::new(Arc::new(storage)),
        search: Arc::new(search),
        config: config.clone(),
    };

    let app = create_router(state);

    let ip = config
        .host
        .parse::<std::net::IpAddr>()
        .map_err(|_| ApiError::Config(format!("Invalid HOST value: {}", config.host)))?;
    let addr = SocketAddr::new(ip, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    let api = api_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::require_bearer,
    ));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        .nest("/api", api)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_origins)),
        )
        .with_state(state)
}

/// API routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", routes::users::router())
        .nest("/projects", routes::projects::router())
        .nest("/appteams", routes::teams::router())
        .nest("/applications", routes::applications::router())
        .nest("/search", routes::search::router())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Health check endpoint
async fn health_check() -> Result<Json<Value>> {
    Ok(Json(json!({
        "status": "healthy",
        "service": "infra-server",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": time::OffsetDateTime::now_utc()
    })))
}
