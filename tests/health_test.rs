mod common;

use axum::http::{Method, StatusCode};

use common::TestApp;

#[tokio::test]
async fn readiness_pings_the_database_and_flags_missing_speech_key() {
    let app = TestApp::new().await;

    let (status, body) = app.json(Method::GET, "/health/ready", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
    assert_eq!(body["status"], "degraded");

    let (status, body) = app.json(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["details"]["database"]["status"], "up");
    assert_eq!(body["details"]["speech"]["status"], "degraded");
}

#[tokio::test]
async fn liveness_and_version_answer() {
    let app = TestApp::new().await;

    let (status, body) = app.json(Method::GET, "/health/live", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["alive"], true);

    let (status, body) = app.json(Method::GET, "/health/version", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;

    let (status, body) = app
        .json(Method::GET, "/api-docs/openapi.json", None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "CartaSmart API");
    assert!(body["paths"]["/orders/{id}"].is_object());
}
