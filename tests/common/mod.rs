#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use cartasmart_api::{
    config::AppConfig,
    db,
    errors::ServiceError,
    health::HealthState,
    services::speech::{AudioUpload, Synthesizer, Transcriber},
    AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Speech provider stand-in: returns canned results and records its inputs.
#[derive(Default)]
pub struct FakeSpeech {
    pub transcript: Option<String>,
    pub audio: Option<Vec<u8>>,
    pub uploads: Mutex<Vec<AudioUpload>>,
    pub spoken: Mutex<Vec<String>>,
}

#[async_trait]
impl Transcriber for FakeSpeech {
    async fn transcribe(&self, audio: AudioUpload) -> Result<String, ServiceError> {
        self.uploads
            .lock()
            .expect("uploads lock poisoned")
            .push(audio);
        self.transcript
            .clone()
            .ok_or_else(|| ServiceError::ExternalServiceError("provider unavailable".into()))
    }
}

#[async_trait]
impl Synthesizer for FakeSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ServiceError> {
        self.spoken
            .lock()
            .expect("spoken lock poisoned")
            .push(text.to_string());
        self.audio
            .clone()
            .ok_or_else(|| ServiceError::ExternalServiceError("provider unavailable".into()))
    }
}

/// Helper harness for spinning up the application against an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub speech: Arc<FakeSpeech>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_speech(FakeSpeech {
            transcript: Some("Quiero dos tacos al pastor".into()),
            audio: Some(b"ID3fake-mp3".to_vec()),
            ..Default::default()
        })
        .await
    }

    /// Construct a test application with fresh database state.
    pub async fn with_speech(speech: FakeSpeech) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // A single connection keeps every query on the same in-memory database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db = Arc::new(pool);
        let speech = Arc::new(speech);
        let state = AppState::new(db.clone(), cfg, speech.clone(), speech.clone());
        let health = Arc::new(HealthState::new(db, false));
        let router = cartasmart_api::app_router(state.clone(), health);

        Self {
            router,
            state,
            speech,
        }
    }

    /// Send a JSON request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Request and decode the JSON body, returning status and payload.
    pub async fn json(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        (status, read_json(response).await)
    }

    pub async fn create_restaurant(&self, name: &str) -> Value {
        let (status, body) = self
            .json(Method::POST, "/restaurants", Some(json!({ "name": name })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    pub async fn create_category(&self, restaurant_id: i64, name: &str) -> Value {
        let (status, body) = self
            .json(
                Method::POST,
                "/menu-categories",
                Some(json!({ "restaurant_id": restaurant_id, "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    pub async fn create_item(&self, payload: Value) -> Value {
        let (status, body) = self.json(Method::POST, "/menu-items", Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    pub async fn create_customer(&self, name: &str, email: &str) -> Value {
        let (status, body) = self
            .json(
                Method::POST,
                "/customers",
                Some(json!({ "name": name, "email": email })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }
}

pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse response body")
    }
}

pub fn id_of(value: &Value) -> i64 {
    value["id"].as_i64().expect("record id")
}
