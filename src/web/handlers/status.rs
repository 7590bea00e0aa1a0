// GET /api/status — resource availability and configured backends.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::status::Status;
use crate::web::AppState;

pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    let status = Status::collect(&state.config);
    Json(serde_json::json!({
        "status": status,
        "active_embedder": state.embedder.name(),
    }))
}
