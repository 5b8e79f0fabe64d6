use axum::{
    Router,
    extract::State,
    http::{Method, Uri, header},
    middleware::{from_fn, from_fn_with_state},
    response::Json,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::infrastructure::{
    auth::TokenCodec,
    config::AppConfig,
    persistence::{Database, PostgresCredentialRepository, PostgresRatingRepository},
};
use crate::presentation::{
    handlers::AppState,
    middleware::{deadline_middleware, error::error_context_middleware, AppError},
    routes,
};

const SERVICE_NAME: &str = "movie-catalog-service";

/// Create the main application router
pub fn create_app(config: &AppConfig, state: AppState) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(create_cors_layer())
        .layer(from_fn(error_context_middleware))
        .layer(from_fn_with_state(config.server.operation_timeout(), deadline_middleware));

    routes::create_routes(state).fallback(not_found_handler).layer(middleware_stack)
}

/// Liveness probe
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": SERVICE_NAME
    }))
}

/// Readiness probe backed by the rating store
///
/// # Errors
/// `ServiceUnavailable` when the store does not answer
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.ratings.health_check().await?;

    Ok(Json(json!({
        "status": "ready",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "checks": { "database": "ok" }
    })))
}

async fn not_found_handler(uri: Uri) -> AppError {
    AppError::NotFound { resource: format!("Route {}", uri.path()) }
}

fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Wire Postgres-backed state from configuration
///
/// # Errors
/// Returns an error if the database is unreachable or the schema cannot be created
pub async fn build_state(config: &AppConfig, database: &Database) -> anyhow::Result<AppState> {
    database.ensure_schema().await?;

    Ok(AppState {
        ratings: Arc::new(PostgresRatingRepository::new(database.pool().clone())),
        credentials: Arc::new(PostgresCredentialRepository::new(database.pool().clone())),
        codec: TokenCodec::new(&config.auth.jwt_secret),
        token_ttl: config.auth.token_ttl(),
    })
}

/// Start the HTTP server and run until ctrl-c
///
/// # Errors
/// Returns an error if the database, the listener or the server fails
pub async fn start_server(config: AppConfig) -> anyhow::Result<()> {
    let database = Database::new(&config.database).await?;
    let state = build_state(&config, &database).await?;

    let app = create_app(&config, state);
    let addr = config.server.socket_addr()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    database.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
