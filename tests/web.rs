// Router tests for the web front end. Run with `--features web`.
#![cfg(feature = "web")]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use thematic::config::{Config, EmbedderBackend};
use thematic::resources::Resources;
use thematic::topics::tfidf::TfIdfEmbedder;
use thematic::web::{build_router, AppState};

fn router(data_dir: PathBuf) -> Router {
    let config = Config {
        openai_api_key: String::new(),
        openai_base_url: "http://127.0.0.1:9".to_string(),
        openai_model: "gpt-4o-mini".to_string(),
        data_dir,
        output_dir: PathBuf::from("data"),
        max_sentences: 1,
        min_topic_size: 2,
        similarity_threshold: None,
        embedder: EmbedderBackend::TfIdf,
    };
    build_router(AppState {
        config: Arc::new(config),
        resources: Arc::new(Resources::builtin()),
        embedder: Arc::new(TfIdfEmbedder::default()),
    })
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_topics(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let dir = tempfile::tempdir().unwrap();
    let response = router(dir.path().to_path_buf())
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn index_serves_html() {
    let dir = tempfile::tempdir().unwrap();
    let response = router(dir.path().to_path_buf())
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
}

#[tokio::test]
async fn empty_text_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let response = router(dir.path().to_path_buf())
        .oneshot(post_topics(
            "/api/topics",
            serde_json::json!({ "text": "   ", "use_openai": false }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Please provide some text to process."
    );
}

#[tokio::test]
async fn topics_returns_one_record_per_chunk() {
    let dir = tempfile::tempdir().unwrap();
    let response = router(dir.path().to_path_buf())
        .oneshot(post_topics(
            "/api/topics",
            serde_json::json!({
                "text": "Oil prices rose. Grain exports fell. Oil output was cut.",
                "use_openai": false
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let rows = body_json(response).await;
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["Chunk"], "Oil prices rose.");
}

#[tokio::test]
async fn index_saves_displayed_result_without_rerun() {
    let dir = tempfile::tempdir().unwrap();
    let response = router(dir.path().to_path_buf())
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("new Blob([JSON.stringify(lastData, null, 4)]"));
    assert_eq!(html.matches("fetch(\"/api/topics\"").count(), 1);
    assert!(!html.contains("download=true"));
}

#[tokio::test]
async fn index_warns_when_hosted_key_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let response = router(dir.path().to_path_buf())
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("id=\"key-warning\" hidden"));
    assert!(html.contains("openai_configured"));
}

#[tokio::test]
async fn hosted_without_key_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let response = router(dir.path().to_path_buf())
        .oneshot(post_topics(
            "/api/topics",
            serde_json::json!({ "text": "Oil prices rose. Oil output was cut.", "use_openai": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = body_json(response).await["error"].as_str().unwrap().to_string();
    assert!(error.contains("no API key"), "got: {error}");
}

#[tokio::test]
async fn sample_without_corpus_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let response = router(dir.path().to_path_buf())
        .oneshot(Request::get("/api/sample").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sample_reads_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let reuters = thematic::resources::download::reuters_dir(dir.path());
    std::fs::create_dir_all(reuters.join("test")).unwrap();
    std::fs::create_dir_all(reuters.join("training")).unwrap();
    std::fs::write(reuters.join("test").join("14826"), "Oil prices rose.").unwrap();
    std::fs::write(reuters.join("training").join("1"), "Grain exports fell.").unwrap();

    let response = router(dir.path().to_path_buf())
        .oneshot(Request::get("/api/sample").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["text"],
        "Oil prices rose. Grain exports fell."
    );
}

#[tokio::test]
async fn status_reports_resources() {
    let dir = tempfile::tempdir().unwrap();
    let response = router(dir.path().to_path_buf())
        .oneshot(Request::get("/api/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["active_embedder"], "tf-idf");
    // The page's missing-key warning reads this flag
    assert_eq!(json["status"]["openai_configured"], false);
    assert_eq!(json["status"]["resources"].as_array().unwrap().len(), 3);
}
