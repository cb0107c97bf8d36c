//! Homeplan Web Server
//!
//! Axum-based HTTP API for the healthy home transition planner.
//!
//! - `GET /plan` computes a first-year plan from quiz query parameters
//! - `GET /catalog` and `GET /catalog/:name` expose the product catalog
//! - `GET /health` reports liveness and the narrative backend in use
//!
//! Error responses are always `{"error": "..."}`; internal details are logged,
//! never returned. Handler panics become a 500 with the same shape.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{self, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use homeplan_core::narrative::{narrative_timeout_from_env, NarrativeBackend, NarrativeClient};
use homeplan_core::pricing::PricingEngine;

mod handlers;

/// Message returned when plan generation fails for any internal reason
pub const PLAN_FAILURE_MESSAGE: &str = "Failed to generate plan";

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = any origin)
    pub allowed_origins: Vec<String>,
    /// Upper bound on one narrative call
    pub narrative_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            narrative_timeout: homeplan_core::narrative::DEFAULT_NARRATIVE_TIMEOUT,
        }
    }
}

impl ServerConfig {
    /// Read `HOMEPLAN_ALLOWED_ORIGINS` (comma-separated) and
    /// `HOMEPLAN_NARRATIVE_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        let allowed_origins = std::env::var("HOMEPLAN_ALLOWED_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_default();

        Self {
            allowed_origins,
            narrative_timeout: narrative_timeout_from_env(),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub engine: PricingEngine,
    pub narrator: NarrativeClient,
    pub config: ServerConfig,
}

/// Create the application router
pub fn create_router(
    engine: PricingEngine,
    narrator: NarrativeClient,
    config: ServerConfig,
) -> Router {
    let cors = cors_layer(&config.allowed_origins);

    let state = Arc::new(AppState {
        engine,
        narrator,
        config,
    });

    Router::new()
        .route("/plan", get(handlers::get_plan))
        .route("/catalog", get(handlers::list_catalog))
        .route("/catalog/:name", get(handlers::get_product))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(cors::Any);

    if allowed_origins.is_empty() {
        layer.allow_origin(cors::Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer.allow_origin(origins)
    }
}

/// Turn a handler panic into the generic failure body
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(panic = %detail, "Handler panicked");

    let mut response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": PLAN_FAILURE_MESSAGE })),
    )
        .into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store"),
    );
    response
}

/// Start the server
pub async fn serve(
    engine: PricingEngine,
    narrator: NarrativeClient,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.allowed_origins.is_empty() {
        info!(origins = ?config.allowed_origins, "CORS restricted");
    }

    check_narrative_backend(&narrator).await;

    info!(
        products = engine.catalog().len(),
        source = %engine.catalog().source(),
        "Catalog loaded"
    );

    let app = create_router(engine, narrator, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log narrative backend status
async fn check_narrative_backend(narrator: &NarrativeClient) {
    match narrator {
        NarrativeClient::Template(_) => {
            info!(
                "Narrative backend: template (set OPENAI_API_KEY or OLLAMA_HOST for model-written narratives)"
            );
        }
        client => {
            if client.health_check().await {
                info!(
                    "Narrative backend connected: {} at {} (model: {})",
                    client.name(),
                    client.host(),
                    client.model()
                );
            } else {
                warn!(
                    "Narrative backend configured but not responding: {} at {} (narratives will be empty)",
                    client.name(),
                    client.host()
                );
            }
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Clients only ever see the generic message
            message: PLAN_FAILURE_MESSAGE.to_string(),
            internal: Some(err.into()),
        }
    }
}
