/*!
 * # Health Check Module
 *
 * Endpoints for monitoring the CartaSmart API:
 *
 * - Basic health check (`/health`) - cached up/down status
 * - Readiness check (`/health/ready`) - pings the database before answering
 * - Liveness check (`/health/live`) - process is alive
 * - Version (`/health/version`) - build information
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Basic health status
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
    Degraded,
}

impl HealthStatus {
    fn http_status(&self) -> StatusCode {
        match self {
            HealthStatus::Up | HealthStatus::Degraded => StatusCode::OK,
            HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Health check detail
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthDetail {
    pub status: HealthStatus,
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Overall health information
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthInfo {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub details: HashMap<String, HealthDetail>,
}

/// Health check state
#[derive(Clone)]
pub struct HealthState {
    pub db: Arc<DatabaseConnection>,
    pub speech_configured: bool,
    pub health_cache: Arc<RwLock<HealthInfo>>,
    pub start_time: SystemTime,
}

impl HealthState {
    pub fn new(db: Arc<DatabaseConnection>, speech_configured: bool) -> Self {
        Self {
            db,
            speech_configured,
            health_cache: Arc::new(RwLock::new(HealthInfo {
                status: HealthStatus::Up,
                version: env!("CARGO_PKG_VERSION").to_string(),
                timestamp: Utc::now(),
                uptime_seconds: 0,
                details: HashMap::new(),
            })),
            start_time: SystemTime::now(),
        }
    }

    /// Calculate system uptime
    pub fn uptime(&self) -> u64 {
        SystemTime::now()
            .duration_since(self.start_time)
            .unwrap_or(Duration::from_secs(0))
            .as_secs()
    }

    /// Refresh the cached health information
    pub async fn update_health(&self) {
        let database = match self.db.ping().await {
            Ok(_) => HealthDetail {
                status: HealthStatus::Up,
                message: None,
                timestamp: Utc::now(),
            },
            Err(e) => {
                error!("Database health check failed: {}", e);
                HealthDetail {
                    status: HealthStatus::Down,
                    message: Some(e.to_string()),
                    timestamp: Utc::now(),
                }
            }
        };

        // Menus and orders work without the speech provider.
        let speech = HealthDetail {
            status: if self.speech_configured {
                HealthStatus::Up
            } else {
                HealthStatus::Degraded
            },
            message: (!self.speech_configured)
                .then(|| "speech provider API key not configured".to_string()),
            timestamp: Utc::now(),
        };

        let mut health = self.health_cache.write().await;
        health.timestamp = Utc::now();
        health.uptime_seconds = self.uptime();
        health.details.insert("database".to_string(), database);
        health.details.insert("speech".to_string(), speech);
        health.status = overall_status(health.details.values());
    }
}

fn overall_status<'a>(details: impl Iterator<Item = &'a HealthDetail> + Clone) -> HealthStatus {
    if details.clone().any(|d| d.status == HealthStatus::Down) {
        HealthStatus::Down
    } else if details.into_iter().any(|d| d.status == HealthStatus::Degraded) {
        HealthStatus::Degraded
    } else {
        HealthStatus::Up
    }
}

/// Returns build and version information
pub async fn version_info() -> impl IntoResponse {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "commit": option_env!("GIT_HASH").unwrap_or("unknown"),
        "built": option_env!("BUILD_TIME").unwrap_or("unknown"),
    }))
}

/// Basic health check endpoint
pub async fn health_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    debug!("Health check endpoint called");

    let health = state.health_cache.read().await;
    (
        health.status.http_status(),
        Json(json!({
            "status": health.status,
            "version": health.version,
            "timestamp": health.timestamp,
            "details": health.details,
        })),
    )
}

/// Readiness check endpoint
pub async fn readiness_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    debug!("Readiness check endpoint called");

    state.update_health().await;
    let health = state.health_cache.read().await;

    (
        health.status.http_status(),
        Json(json!({
            "ready": health.status != HealthStatus::Down,
            "status": health.status,
            "timestamp": health.timestamp,
        })),
    )
}

/// Liveness check endpoint
pub async fn liveness_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "alive": true,
            "uptime_seconds": state.uptime(),
            "timestamp": Utc::now(),
        })),
    )
}

/// Run periodic health checks
pub async fn run_health_checker(state: Arc<HealthState>) {
    info!("Starting periodic health checker");

    let mut interval = tokio::time::interval(Duration::from_secs(30));

    loop {
        interval.tick().await;
        state.update_health().await;

        let health = state.health_cache.read().await;
        if health.status != HealthStatus::Up {
            for (name, detail) in &health.details {
                if detail.status != HealthStatus::Up {
                    warn!("Component {name} is not healthy: {:?}", detail.status);
                }
            }
        }
    }
}

/// Router for the `/health` subtree
pub fn health_routes(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
        .route("/version", get(version_info))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(status: HealthStatus) -> HealthDetail {
        HealthDetail {
            status,
            message: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn down_component_wins_over_degraded() {
        let details = [detail(HealthStatus::Degraded), detail(HealthStatus::Down)];
        assert_eq!(overall_status(details.iter()), HealthStatus::Down);

        let details = [detail(HealthStatus::Up), detail(HealthStatus::Degraded)];
        assert_eq!(overall_status(details.iter()), HealthStatus::Degraded);

        let details = [detail(HealthStatus::Up)];
        assert_eq!(overall_status(details.iter()), HealthStatus::Up);
    }

    #[tokio::test]
    async fn readiness_reports_database_and_speech() {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        let state = HealthState::new(Arc::new(db), false);
        state.update_health().await;

        let health = state.health_cache.read().await;
        assert_eq!(health.details["database"].status, HealthStatus::Up);
        assert_eq!(health.details["speech"].status, HealthStatus::Degraded);
        assert_eq!(health.status, HealthStatus::Degraded);
    }
}
