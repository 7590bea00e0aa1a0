// GET /api/sample — the Reuters sample text for the "use sample" button.
//
// Returns 404 when the corpus hasn't been downloaded.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::warn;

use crate::resources::corpus::{load_sample, SAMPLE_DOCUMENTS};
use crate::web::{api_error, AppState};

pub async fn get_sample(State(state): State<AppState>) -> impl IntoResponse {
    let data_dir = state.config.data_dir.clone();
    let loaded =
        tokio::task::spawn_blocking(move || load_sample(&data_dir, SAMPLE_DOCUMENTS)).await;

    match loaded {
        Ok(Ok(text)) => Json(serde_json::json!({ "text": text })).into_response(),
        Ok(Err(e)) => {
            warn!(error = %e, "Sample corpus unavailable");
            api_error(StatusCode::NOT_FOUND, &format!("{e:#}"))
        }
        Err(e) => api_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}
