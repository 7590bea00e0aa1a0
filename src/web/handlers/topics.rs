// POST /api/topics — run the pipeline on submitted text.
//
// Body: {"text": "...", "use_openai": false, "api_key": "..."}.
// Returns the assignment array. The page saves that same array as
// `topics.json`, so there is no separate download route.
//
// Returns 400 for empty text and 500 with {"error": ...} when the
// pipeline fails.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::warn;

use crate::pipeline::orchestrator::{Pipeline, PipelineConfig};
use crate::web::{api_error, AppState};

#[derive(Debug, Deserialize)]
pub struct TopicsRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub use_openai: bool,
    /// Overrides OPENAI_API_KEY for this request when non-empty
    #[serde(default)]
    pub api_key: Option<String>,
}

pub async fn process_topics(
    State(state): State<AppState>,
    Json(request): Json<TopicsRequest>,
) -> Response {
    if request.text.trim().is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "Please provide some text to process.");
    }

    let mut config =
        PipelineConfig::from_config(&state.config).with_hosted_representation(request.use_openai);
    if let Some(key) = request.api_key.filter(|k| !k.trim().is_empty()) {
        config.api_key = key;
    }

    let mut pipeline = Pipeline::new(config, state.resources.clone(), state.embedder.clone());
    match pipeline.process_text(&request.text).await {
        Ok(assignments) => Json(assignments).into_response(),
        Err(e) => {
            warn!(error = %format!("{e:#}"), "Topic pipeline failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, &format!("{e:#}"))
        }
    }
}
