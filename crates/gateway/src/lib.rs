//! HTTP API gateway for TESS.
//!
//! One request is one turn: `POST /v1/chat` hands the message to the
//! [`TurnController`] and returns its reply together with the dossier id
//! the client should send back next time. Everything else is read-only
//! inspection plus dossier reset.
//!
//! Built on Axum.

pub mod api_v1;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{Router, response::Json, routing::get};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::info;

use tess_agent::TurnController;
use tess_core::event::EventBus;

/// Shared state for all routes.
pub struct GatewayState {
    pub controller: Arc<TurnController>,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

pub type SharedState = Arc<GatewayState>;

impl GatewayState {
    pub fn new(controller: Arc<TurnController>) -> SharedState {
        Arc::new(Self {
            controller,
            started_at: chrono::Utc::now(),
        })
    }
}

/// Build the full router: health, index, and the v1 API.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::exact(
            axum::http::HeaderValue::from_static("http://localhost:8501"),
        ))
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .nest("/v1", api_v1::v1_router(state))
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB body limit
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
///
/// Builds the provider, store, and turn controller once and shares them
/// across requests.
pub async fn start(config: tess_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let provider = tess_providers::build_from_config(&config)
        .default()
        .ok_or("No default provider configured")?;
    let store = tess_store::build_from_config(&config.store);
    let event_bus = Arc::new(EventBus::default());
    let controller = Arc::new(TurnController::from_config(
        &config, provider, store, event_bus,
    ));

    let app = build_router(GatewayState::new(controller));

    info!(addr = %addr, store = config.store.backend.as_str(), "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

#[derive(Serialize, Deserialize)]
pub struct IndexResponse {
    pub name: String,
    pub version: String,
    pub description: String,
}

async fn index_handler() -> Json<IndexResponse> {
    Json(IndexResponse {
        name: "TESS".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        description: "Dossier-based Dutch tax assistant".into(),
    })
}
