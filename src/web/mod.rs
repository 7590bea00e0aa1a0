// Web server — Axum-based front end for the topic pipeline.
//
// GET / serves a single embedded HTML page. All /api/* routes serve JSON.
// Text resources and the embedder are built once at startup and shared by
// every request; each request gets its own pipeline instance.

use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::resources::{self, Resources};
use crate::topics::traits::DocumentEmbedder;

pub mod handlers;

static INDEX_HTML: &str = include_str!("index.html");

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub resources: Arc<Resources>,
    pub embedder: Arc<dyn DocumentEmbedder>,
}

impl AppState {
    /// Load resources and the configured embedder.
    pub fn load(config: Config) -> Result<Self> {
        let resources = resources::ensure_ready(&config.data_dir);
        let embedder = crate::topics::build_embedder(&config)?;
        Ok(Self {
            config: Arc::new(config),
            resources,
            embedder,
        })
    }
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(config: Config, port: u16, bind: &str) -> Result<()> {
    let state = AppState::load(config)?;
    let embedder = state.embedder.name();
    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!(embedder = embedder, "Thematic listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/status", get(handlers::status::get_status))
        .route("/api/sample", get(handlers::sample::get_sample))
        .route("/api/topics", post(handlers::topics::process_topics))
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check, always returns 200 OK.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
